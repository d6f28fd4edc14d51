//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use serde_json::json;
use sertiva::{ClientConfig, Sertiva};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TOKEN: &str = "ACCESS TOKEN";

/// A client talking to `server`, caching its token in a fresh directory.
pub struct Harness {
    pub server: MockServer,
    pub cache_dir: TempDir,
    pub sertiva: Sertiva,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let cache_dir = tempfile::tempdir().expect("should be able to create a temp dir");
        let config = ClientConfig::new("", "")
            .with_base_url(&format!("{}/api/v2/", server.uri()))
            .expect("mock server URI should be a valid base URL")
            .with_cache_path(cache_dir.path().join(".cache"));
        let sertiva = Sertiva::with_config(config).expect("should be able to build client");

        Self {
            server,
            cache_dir,
            sertiva,
        }
    }

    /// Starts a harness whose authorization endpoint always hands out [`TOKEN`].
    pub async fn authorized() -> Self {
        let harness = Self::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"token_type": "Bearer", "expires_in": 0, "access_token": TOKEN}
            })))
            .mount(&harness.server)
            .await;
        harness
    }

    pub fn cache_path(&self) -> std::path::PathBuf {
        self.cache_dir.path().join(".cache")
    }

    /// Requests received so far, minus authorization exchanges.
    pub async fn resource_requests(&self) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() != "/api/v2/authorization")
            .collect()
    }
}

pub fn success(data: serde_json::Value) -> serde_json::Value {
    json!({"code": 200, "status": "success", "data": data})
}
