use std::{fmt, path::PathBuf, time::Duration};

use url::Url;

use crate::error::{Error, Result};

/// The production API prefix every request is made against.
pub const DEFAULT_BASE_URL: &str = "https://api.sertiva.id/api/v2/";

/// Where the access token is cached unless told otherwise.
pub const DEFAULT_CACHE_PATH: &str = ".cache";

/// The client ID and secret issued by Sertiva.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Everything needed to construct a [`Sertiva`](crate::Sertiva) client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: ClientCredentials,
    /// API prefix; resource paths are appended to it. `None` means production.
    pub base_url: Option<Url>,
    /// File the access token is persisted to.
    pub cache_path: PathBuf,
    /// Per-request timeout. `None` waits as long as the transport does.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration pointing at production with the default cache path.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            credentials: ClientCredentials {
                client_id: client_id.into(),
                client_secret: client_secret.into(),
            },
            base_url: None,
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            timeout: None,
            user_agent: concat!("sertiva-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Points the client at a different API prefix, e.g. a staging host.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url)
            .map_err(|error| Error::Config(format!("invalid base URL {base_url:?}: {error}")))?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base URL {base_url:?} cannot carry a path"
            )));
        }
        // Relative joins against the prefix must not drop its last segment.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = Some(url);
        Ok(self)
    }

    pub fn with_cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
        self.cache_path = cache_path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The API prefix requests are made against.
    pub(crate) fn resolved_base_url(&self) -> Result<Url> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|error| Error::Config(format!("invalid default base URL: {error}"))),
        }
    }

    /// Builds the HTTP client shared by authentication and resource calls.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|error| Error::Config(format!("unable to build HTTP client: {error}")))
    }
}
