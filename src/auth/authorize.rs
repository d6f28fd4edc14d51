use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use url::Url;

use super::storage::TokenCache;
use crate::{
    config::{ClientConfig, ClientCredentials},
    error::{Error, HttpFailure, Result},
};

/// Every client asks for the full set of scopes.
const SCOPE: &str = "issue verify revoke";

/// Path of the authorization endpoint, relative to the API prefix.
const AUTHORIZATION_PATH: &str = "authorization";

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    scope: &'a str,
}

/// `{"data": {"token_type": "Bearer", "expires_in": 31536000, "access_token": "..."}}`
#[derive(Deserialize)]
struct TokenResponse {
    data: TokenData,
}

#[derive(Deserialize)]
struct TokenData {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchanges client credentials for a bearer token, caching the result.
#[derive(Debug)]
pub struct Authenticator {
    client: reqwest::Client,
    token_url: Url,
    credentials: ClientCredentials,
    // Held across the exchange so concurrent callers wait for one token
    // instead of each requesting their own.
    cache: Mutex<TokenCache>,
}

impl Authenticator {
    pub(crate) fn new(client: reqwest::Client, config: &ClientConfig) -> Result<Self> {
        let token_url = config.resolved_base_url()?.join(AUTHORIZATION_PATH).map_err(|error| {
            Error::Config(format!("unable to build authorization URL: {error}"))
        })?;

        Ok(Self {
            client,
            token_url,
            credentials: config.credentials.clone(),
            cache: Mutex::new(TokenCache::new(&config.cache_path)),
        })
    }

    /// Returns a bearer token, requesting one from Sertiva only on a cache miss.
    pub async fn token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if let Some(access_token) = cache.read().await {
            return Ok(access_token);
        }

        let (access_token, lifetime) = self.request_token().await?;
        cache.write(&access_token, lifetime).await;

        // Hand back what the cache now holds so both always agree.
        Ok(cache.read().await.unwrap_or(access_token))
    }

    /// Drops the in-memory token so the next call consults the cache file
    /// and, failing that, Sertiva.
    pub async fn invalidate(&self) {
        self.cache.lock().await.clear();
    }

    #[tracing::instrument(
        err,
        skip(self),
        fields(token_url = %self.token_url, client_id = %self.credentials.client_id),
    )]
    async fn request_token(&self) -> Result<(String, Option<Duration>)> {
        tracing::info!("requesting access token from Sertiva");

        let payload = TokenRequest {
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
            scope: SCOPE,
        };
        let response = self
            .client
            .post(self.token_url.clone())
            .json(&payload)
            .send()
            .await?;

        tracing::debug!(
            response.status = response.status().as_u16(),
            "received token response"
        );

        if !response.status().is_success() {
            let failure = HttpFailure::from_response(response).await;
            tracing::error!(status = failure.status, "failed to request access token");
            return Err(Error::Auth(failure));
        }

        let body = response.bytes().await?;
        let TokenResponse { data } = serde_json::from_slice(&body)?;

        // Zero means the authority gave us nothing useful to go on.
        let lifetime = data
            .expires_in
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        tracing::info!(
            lifetime = lifetime.map(|l| l.as_secs()),
            "received new access token"
        );

        Ok((data.access_token, lifetime))
    }
}
