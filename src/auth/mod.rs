//! Client-credential authorization and access token caching.

mod authorize;
mod jwt;
mod storage;

pub use authorize::Authenticator;
pub use storage::{CachedToken, TokenCache};
