use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The only claim we care about.
#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<u64>,
}

/// Peeks at the `exp` claim of a token, if the token happens to be a JWT.
///
/// Sertiva documents its access tokens as opaque strings, so this never
/// fails: anything that isn't a three-part, base64url-encoded JSON token
/// simply has no known expiry. The signature is not checked; the API does
/// that for us.
pub fn expiry(token: &str) -> Option<SystemTime> {
    let components: Vec<&str> = token.split('.').collect();
    let [_, encoded_payload, _] = components.as_slice() else {
        return None;
    };

    let decoded_payload = URL_SAFE_NO_PAD.decode(encoded_payload).ok()?;
    let claims: ExpiryClaim = serde_json::from_slice(&decoded_payload).ok()?;

    // An `exp` past what the platform clock can represent tells us nothing.
    UNIX_EPOCH.checked_add(Duration::from_secs(claims.exp?))
}

/// Builds an unsigned token around `payload`, for tests that need a JWT.
#[cfg(test)]
pub(crate) fn unsigned(payload: &str) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    )
}
