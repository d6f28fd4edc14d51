use serde_json::Value;

use super::ApiClient;
use crate::error::Result;

/// Certificate designs available to the account.
#[derive(Debug, Clone, Copy)]
pub struct Designs<'a> {
    client: &'a ApiClient,
}

impl<'a> Designs<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lists designs. `page` defaults to the first page.
    pub async fn list(&self, page: Option<u32>) -> Result<Value> {
        tracing::debug!("listing designs");
        self.client.get(&["designs"], Some(page.unwrap_or(1))).await
    }

    pub async fn detail(&self, design_id: &str) -> Result<Value> {
        tracing::debug!(design_id, "fetching design");
        self.client.get(&["designs", design_id], None).await
    }
}
