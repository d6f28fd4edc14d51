use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, Method};
use crate::error::Result;

/// Who a new batch of credentials is issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTarget {
    /// Draft recipients picked by ID.
    RecipientIds,
    /// Recipient records supplied directly in the request.
    Recipients,
    /// Every recipient drafted on the template.
    AllDrafted,
}

/// Parameters for [`Issuance::issue`].
///
/// Dates are passed to Sertiva as given. When both recipient IDs and
/// recipient records are set, the IDs win and the records are not sent.
#[derive(Debug, Clone, Default)]
pub struct IssueRequest {
    template_id: String,
    issuance_date: String,
    expiration_date: String,
    recipient_ids: Vec<String>,
    recipients: Vec<Value>,
}

impl IssueRequest {
    /// Issues to every recipient drafted on the template unless narrowed down.
    pub fn new(
        template_id: impl Into<String>,
        issuance_date: impl Into<String>,
        expiration_date: impl Into<String>,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            issuance_date: issuance_date.into(),
            expiration_date: expiration_date.into(),
            ..Self::default()
        }
    }

    /// Only issue to these draft recipients.
    pub fn recipient_ids<I, S>(mut self, recipient_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipient_ids = recipient_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Issue to these recipients directly, without drafting them first.
    pub fn recipients(mut self, recipients: impl IntoIterator<Item = Value>) -> Self {
        self.recipients = recipients.into_iter().collect();
        self
    }

    pub fn target(&self) -> IssueTarget {
        if !self.recipient_ids.is_empty() {
            IssueTarget::RecipientIds
        } else if !self.recipients.is_empty() {
            IssueTarget::Recipients
        } else {
            IssueTarget::AllDrafted
        }
    }

    fn payload(&self) -> IssuePayload<'_> {
        let target = self.target();
        IssuePayload {
            template_id: &self.template_id,
            issuance_date: &self.issuance_date,
            expiration_date: &self.expiration_date,
            recipient_ids: (target == IssueTarget::RecipientIds).then_some(&self.recipient_ids),
            recipients: (target == IssueTarget::Recipients).then_some(&self.recipients),
        }
    }
}

#[derive(Serialize)]
struct IssuePayload<'a> {
    template_id: &'a str,
    issuance_date: &'a str,
    expiration_date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipient_ids: Option<&'a Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipients: Option<&'a Vec<Value>>,
}

#[derive(Serialize)]
struct VerifyPayload<'a> {
    credential_ids: Vec<&'a str>,
}

#[derive(Serialize)]
struct RevokePayload<'a> {
    reason: &'a str,
    credential_ids: Vec<&'a str>,
}

/// Issuing, verifying, and revoking credentials.
#[derive(Debug, Clone, Copy)]
pub struct Issuance<'a> {
    client: &'a ApiClient,
}

impl<'a> Issuance<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Issues new credentials from a template.
    pub async fn issue(&self, request: &IssueRequest) -> Result<Value> {
        let payload = request.payload();
        tracing::debug!(
            template_id = %request.template_id,
            target = ?request.target(),
            "issuing credentials"
        );
        self.client
            .call(Method::Post, &["issue"], Some(&payload), None)
            .await
    }

    /// Checks whether credentials are still valid.
    pub async fn verify<S: AsRef<str>>(&self, credential_ids: &[S]) -> Result<Value> {
        let payload = VerifyPayload {
            credential_ids: credential_ids.iter().map(AsRef::as_ref).collect(),
        };
        tracing::debug!(count = credential_ids.len(), "verifying credentials");
        self.client
            .call(Method::Post, &["verify"], Some(&payload), None)
            .await
    }

    pub async fn revoke<S: AsRef<str>>(&self, credential_ids: &[S], reason: &str) -> Result<Value> {
        let payload = RevokePayload {
            reason,
            credential_ids: credential_ids.iter().map(AsRef::as_ref).collect(),
        };
        tracing::debug!(count = credential_ids.len(), "revoking credentials");
        self.client
            .call(Method::Delete, &["revoke"], Some(&payload), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> IssueRequest {
        IssueRequest::new("tpl", "2024-01-01", "2025-01-01")
    }

    #[test]
    fn no_recipients_issues_to_all_drafted() {
        let request = request();

        assert_eq!(request.target(), IssueTarget::AllDrafted);
        assert_eq!(
            serde_json::to_value(request.payload()).unwrap(),
            json!({
                "template_id": "tpl",
                "issuance_date": "2024-01-01",
                "expiration_date": "2025-01-01",
            })
        );
    }

    #[test]
    fn recipient_ids_win_over_recipients() {
        let request = request()
            .recipient_ids(["r1", "r2"])
            .recipients([json!({"name": "r3"})]);

        assert_eq!(request.target(), IssueTarget::RecipientIds);
        assert_eq!(
            serde_json::to_value(request.payload()).unwrap(),
            json!({
                "template_id": "tpl",
                "issuance_date": "2024-01-01",
                "expiration_date": "2025-01-01",
                "recipient_ids": ["r1", "r2"],
            })
        );
    }

    #[test]
    fn empty_recipient_ids_fall_back_to_recipients() {
        let request = request()
            .recipient_ids(Vec::<String>::new())
            .recipients([json!({"name": "r1", "phone": "08123218"})]);

        assert_eq!(request.target(), IssueTarget::Recipients);
        assert_eq!(
            serde_json::to_value(request.payload()).unwrap()["recipients"],
            json!([{"name": "r1", "phone": "08123218"}])
        );
    }
}
