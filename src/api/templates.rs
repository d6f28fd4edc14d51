use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, Method};
use crate::error::Result;

#[derive(Serialize)]
struct NewTemplate<'a> {
    design_id: &'a str,
    title: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct TemplateChanges<'a> {
    title: &'a str,
    description: &'a str,
}

/// Certificate templates, each bound to a design.
#[derive(Debug, Clone, Copy)]
pub struct Templates<'a> {
    client: &'a ApiClient,
}

impl<'a> Templates<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lists templates. `page` defaults to the first page.
    pub async fn list(&self, page: Option<u32>) -> Result<Value> {
        tracing::debug!("listing templates");
        self.client.get(&["templates"], Some(page.unwrap_or(1))).await
    }

    pub async fn detail(&self, template_id: &str) -> Result<Value> {
        tracing::debug!(template_id, "fetching template");
        self.client.get(&["templates", template_id], None).await
    }

    /// Creates a template from an existing design.
    pub async fn create(&self, design_id: &str, title: &str, description: &str) -> Result<Value> {
        let payload = NewTemplate {
            design_id,
            title,
            description,
        };
        tracing::debug!(design_id, "creating template");
        self.client
            .call(Method::Post, &["templates"], Some(&payload), None)
            .await
    }

    /// Replaces the title and description of a template.
    pub async fn update(&self, template_id: &str, title: &str, description: &str) -> Result<Value> {
        let payload = TemplateChanges { title, description };
        tracing::debug!(template_id, "updating template");
        self.client
            .call(Method::Patch, &["templates", template_id], Some(&payload), None)
            .await
    }
}
