//! Thin wrappers around the Sertiva resource endpoints.
//!
//! Every operation performs a single request and returns the response JSON
//! unchanged.

mod client;
mod credentials;
mod designs;
mod issuance;
mod recipients;
mod templates;

pub use client::{ApiClient, Method};
pub use credentials::Credentials;
pub use designs::Designs;
pub use issuance::{Issuance, IssueRequest, IssueTarget};
pub use recipients::Recipients;
pub use templates::Templates;
