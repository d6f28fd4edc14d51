use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible error types while talking to Sertiva.
#[derive(Debug, Error)]
pub enum Error {
    /// The authorization exchange was rejected.
    #[error("authorization failed: {0}")]
    Auth(HttpFailure),
    /// A resource request was rejected.
    #[error("request failed: {0}")]
    Api(HttpFailure),
    /// The request never produced a response (connect, timeout, body read).
    #[error("error sending request to Sertiva")]
    Request(#[from] reqwest::Error),
    /// A successful response did not carry the JSON we expected.
    #[error("error decoding response body")]
    Decode(#[from] serde_json::Error),
    /// The client could not be constructed from the given configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// The HTTP failure behind an [`Error::Auth`] or [`Error::Api`], if any.
    pub fn http_failure(&self) -> Option<&HttpFailure> {
        match self {
            Self::Auth(failure) | Self::Api(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A non-2xx response from Sertiva.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    /// Status code of the response.
    pub status: u16,
    /// The request URL followed by the message the server gave.
    pub message: String,
    /// Canonical reason phrase for the status code.
    pub reason: String,
}

impl HttpFailure {
    /// Reads the body of a failed response into an `HttpFailure`.
    ///
    /// Sertiva error bodies carry a `message` field. When the body is not
    /// JSON or lacks that field we fall back to the raw text, and then to
    /// the reason phrase.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let url = response.url().to_string();
        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
        let body = response.text().await.unwrap_or_default();

        let server_message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_owned))
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_owned()))
            .unwrap_or_else(|| reason.clone());

        Self {
            status: status.as_u16(),
            message: format!("{url}: {server_message}"),
            reason,
        }
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "http status: {}, {}, reason: {}",
            self.status, self.message, self.reason
        )
    }
}
