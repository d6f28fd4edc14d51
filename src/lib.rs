//! Client library for the [Sertiva](https://sertiva.id) credential issuance API.
//!
//! ```no_run
//! # async fn example() -> sertiva::Result<()> {
//! use sertiva::{IssueRequest, Sertiva};
//!
//! let sertiva = Sertiva::new("client-id", "client-secret")?;
//!
//! let designs = sertiva.designs().list(None).await?;
//! let template = sertiva
//!     .templates()
//!     .create("design-id", "Webinar", "Certificate of attendance")
//!     .await?;
//!
//! let request = IssueRequest::new("template-id", "2024-01-01", "2025-01-01")
//!     .recipient_ids(["recipient-id"]);
//! let issued = sertiva.issuance().issue(&request).await?;
//! # let _ = (designs, template, issued);
//! # Ok(())
//! # }
//! ```
//!
//! The access token is cached in memory and in a file (`.cache` by default),
//! so it is only requested once per token lifetime. Logging goes through
//! `tracing`; install a subscriber to see it.

use std::sync::Arc;

pub mod api;
pub mod auth;
mod config;
mod error;

pub use api::{
    ApiClient, Credentials, Designs, Issuance, IssueRequest, IssueTarget, Method, Recipients,
    Templates,
};
pub use auth::Authenticator;
pub use config::{ClientConfig, ClientCredentials, DEFAULT_BASE_URL, DEFAULT_CACHE_PATH};
pub use error::{Error, HttpFailure, Result};

/// Entry point bundling authentication and every resource client.
#[derive(Debug, Clone)]
pub struct Sertiva {
    auth: Arc<Authenticator>,
    client: ApiClient,
}

impl Sertiva {
    /// Creates a client against production, caching the token in `.cache`.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(client_id, client_secret))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = config.http_client()?;
        let base_url = config.resolved_base_url()?;
        let auth = Arc::new(Authenticator::new(http.clone(), &config)?);
        let client = ApiClient::new(http, base_url, Arc::clone(&auth));

        Ok(Self { auth, client })
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    /// The underlying requester, for endpoints without a dedicated wrapper.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn designs(&self) -> Designs<'_> {
        Designs::new(&self.client)
    }

    pub fn templates(&self) -> Templates<'_> {
        Templates::new(&self.client)
    }

    pub fn recipients(&self) -> Recipients<'_> {
        Recipients::new(&self.client)
    }

    pub fn credentials(&self) -> Credentials<'_> {
        Credentials::new(&self.client)
    }

    /// Issuing, verifying, and revoking credentials.
    pub fn issuance(&self) -> Issuance<'_> {
        Issuance::new(&self.client)
    }
}
