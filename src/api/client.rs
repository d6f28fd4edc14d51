use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{
    auth::Authenticator,
    error::{Error, HttpFailure, Result},
};

/// HTTP verbs the Sertiva API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Makes authorized requests against the API prefix.
///
/// Cloning is cheap; clones share the HTTP connection pool and token cache.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    auth: Arc<Authenticator>,
}

impl ApiClient {
    pub(crate) fn new(client: reqwest::Client, base_url: Url, auth: Arc<Authenticator>) -> Self {
        Self {
            client,
            base_url,
            auth,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a request and returns the parsed JSON body.
    ///
    /// `path` is a list of segments appended to the API prefix; each one is
    /// percent-encoded on its own. `page`, when given, is sent as the `page`
    /// query parameter. `payload`, when given, is sent as the JSON body.
    #[tracing::instrument(skip(self, payload), fields(endpoint = %path.join("/")))]
    pub async fn call<P>(
        &self,
        method: Method,
        path: &[&str],
        payload: Option<&P>,
        page: Option<u32>,
    ) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let token = self.auth.token().await?;

        let mut request = self
            .client
            .request(method.into(), url)
            .bearer_auth(token);
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        tracing::debug!("sending request to Sertiva");
        let response = request.send().await?;

        if !response.status().is_success() {
            let failure = HttpFailure::from_response(response).await;
            tracing::error!(status = failure.status, "Sertiva rejected request");
            return Err(Error::Api(failure));
        }

        let body = response.bytes().await?;
        let results = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)?
        };

        tracing::info!("request to Sertiva succeeded");
        Ok(results)
    }

    /// `GET` without a body.
    pub async fn get(&self, path: &[&str], page: Option<u32>) -> Result<Value> {
        self.call::<()>(Method::Get, path, None, page).await
    }

    fn endpoint(&self, path: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }
}
