use serde_json::Value;

use super::ApiClient;
use crate::error::Result;

/// Credentials (certificates) that have already been issued.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    client: &'a ApiClient,
}

impl<'a> Credentials<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lists issued credentials. `page` defaults to the first page.
    pub async fn list(&self, page: Option<u32>) -> Result<Value> {
        tracing::debug!("listing credentials");
        self.client.get(&["credentials"], Some(page.unwrap_or(1))).await
    }

    pub async fn detail(&self, credential_id: &str) -> Result<Value> {
        tracing::debug!(credential_id, "fetching credential");
        self.client.get(&["credentials", credential_id], None).await
    }
}
