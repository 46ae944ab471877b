//! Client-stage submitter: posts the form to the endpoint and decodes `{ ok, error }`.

use reqwest::Client;
use serde_json::json;
use tracing::warn;

use crate::result::{ContactResponse, FailureReason, SubmissionResult};
use crate::submission::{CAPTCHA_FIELDS, ContactFields, HONEYPOT_FIELD};

#[derive(Debug, Clone)]
pub struct ContactClient {
    http: Client,
    endpoint: String,
}

impl ContactClient {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit trimmed fields with the CAPTCHA token.
    ///
    /// One request per call; callers keep at most one in flight per form. Transport faults and
    /// unreadable responses surface as [`FailureReason::Network`].
    pub async fn submit(&self, fields: &ContactFields, token: &str) -> SubmissionResult {
        let fields = fields.trimmed();
        let mut body = json!({
            "name": fields.name,
            "email": fields.email,
            "message": fields.message,
        });
        body[HONEYPOT_FIELD] = json!("");
        body[CAPTCHA_FIELDS[0]] = json!(token);

        let response = match self.http.post(&self.endpoint).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, endpoint = %self.endpoint, "contact endpoint unreachable");
                return SubmissionResult::Failure(FailureReason::Network);
            }
        };
        let status = response.status();
        match response.json::<ContactResponse>().await {
            Ok(decoded) if status.is_success() => decoded.into_result(),
            Ok(decoded) => match decoded.into_result() {
                SubmissionResult::Success => SubmissionResult::Failure(FailureReason::Unrecognized),
                failure => failure,
            },
            Err(err) => {
                warn!(error = %err, %status, "contact endpoint answered with an unreadable body");
                SubmissionResult::Failure(FailureReason::Network)
            }
        }
    }
}
