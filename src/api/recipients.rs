use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, Method};
use crate::error::Result;

#[derive(Serialize)]
struct RecipientData<'a> {
    recipients: &'a [Value],
}

#[derive(Serialize)]
struct RecipientIds<'a> {
    recipient_ids: Vec<&'a str>,
}

/// Draft recipients attached to a template, waiting to be issued to.
///
/// Recipient records are free-form JSON objects (`name`, `email`, `phone`,
/// `fields`, and an `id` when updating) passed to Sertiva unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Recipients<'a> {
    client: &'a ApiClient,
}

impl<'a> Recipients<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lists the draft recipients of a template. `page` defaults to the first page.
    pub async fn list(&self, template_id: &str, page: Option<u32>) -> Result<Value> {
        tracing::debug!(template_id, "listing draft recipients");
        self.client
            .get(&["templates", template_id, "recipients"], Some(page.unwrap_or(1)))
            .await
    }

    pub async fn create(&self, template_id: &str, recipients: &[Value]) -> Result<Value> {
        let payload = RecipientData { recipients };
        tracing::debug!(template_id, count = recipients.len(), "creating draft recipients");
        self.client
            .call(
                Method::Post,
                &["templates", template_id, "recipients"],
                Some(&payload),
                None,
            )
            .await
    }

    /// Updates draft recipients; each record must carry its `id`.
    pub async fn update(&self, template_id: &str, recipients: &[Value]) -> Result<Value> {
        let payload = RecipientData { recipients };
        tracing::debug!(template_id, count = recipients.len(), "updating draft recipients");
        self.client
            .call(
                Method::Patch,
                &["templates", template_id, "recipients"],
                Some(&payload),
                None,
            )
            .await
    }

    pub async fn delete<S: AsRef<str>>(&self, template_id: &str, recipient_ids: &[S]) -> Result<Value> {
        let payload = RecipientIds {
            recipient_ids: recipient_ids.iter().map(AsRef::as_ref).collect(),
        };
        tracing::debug!(template_id, count = recipient_ids.len(), "deleting draft recipients");
        self.client
            .call(
                Method::Delete,
                &["templates", template_id, "recipients"],
                Some(&payload),
                None,
            )
            .await
    }
}
