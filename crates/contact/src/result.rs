//! Submission outcomes and the `{ ok, error }` wire response.

use serde::{Deserialize, Serialize};

/// Why a submission was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InvalidBody,
    MissingFields,
    InvalidEmail,
    /// Client stage only: no CAPTCHA token yet.
    CaptchaRequired,
    CaptchaFailed,
    CaptchaError,
    SendFailed,
    /// Client stage only: the endpoint could not be reached or answered garbage.
    Network,
    /// Client stage only: the endpoint reported a code this build does not know.
    Unrecognized,
}

impl FailureReason {
    pub const ALL: [FailureReason; 9] = [
        FailureReason::InvalidBody,
        FailureReason::MissingFields,
        FailureReason::InvalidEmail,
        FailureReason::CaptchaRequired,
        FailureReason::CaptchaFailed,
        FailureReason::CaptchaError,
        FailureReason::SendFailed,
        FailureReason::Network,
        FailureReason::Unrecognized,
    ];

    /// Wire code, as found in the `error` field of the response.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::InvalidBody => "invalid_body",
            FailureReason::MissingFields => "missing_fields",
            FailureReason::InvalidEmail => "invalid_email",
            FailureReason::CaptchaRequired => "captcha_required",
            FailureReason::CaptchaFailed => "captcha_failed",
            FailureReason::CaptchaError => "captcha_error",
            FailureReason::SendFailed => "send_failed",
            FailureReason::Network => "network",
            FailureReason::Unrecognized => "unrecognized",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|reason| reason.code() == code)
    }

    /// HTTP status the endpoint answers with: 400 for input defects, 500 for collaborator faults.
    pub fn http_status(&self) -> u16 {
        match self {
            FailureReason::InvalidBody
            | FailureReason::MissingFields
            | FailureReason::InvalidEmail
            | FailureReason::CaptchaRequired
            | FailureReason::CaptchaFailed => 400,
            FailureReason::CaptchaError
            | FailureReason::SendFailed
            | FailureReason::Network
            | FailureReason::Unrecognized => 500,
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of one submission attempt. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionResult {
    Success,
    Failure(FailureReason),
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success)
    }

    pub fn http_status(&self) -> u16 {
        match self {
            SubmissionResult::Success => 200,
            SubmissionResult::Failure(reason) => reason.http_status(),
        }
    }

    pub fn to_response(&self) -> ContactResponse {
        match self {
            SubmissionResult::Success => ContactResponse::ok(),
            SubmissionResult::Failure(reason) => ContactResponse::failed(reason.code()),
        }
    }
}

impl From<FailureReason> for SubmissionResult {
    fn from(reason: FailureReason) -> Self {
        SubmissionResult::Failure(reason)
    }
}

/// JSON body of the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failed(code: &str) -> Self {
        Self {
            ok: false,
            error: Some(code.to_string()),
        }
    }

    /// Interpret a response received by the client stage.
    pub fn into_result(self) -> SubmissionResult {
        if self.ok {
            return SubmissionResult::Success;
        }
        let reason = self
            .error
            .as_deref()
            .and_then(FailureReason::from_code)
            .unwrap_or(FailureReason::Unrecognized);
        SubmissionResult::Failure(reason)
    }
}
