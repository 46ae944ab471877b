//! Submission fields, body parsing and the shared validation rules.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::result::FailureReason;

/// Hidden decoy input; humans leave it empty.
pub const HONEYPOT_FIELD: &str = "_company";
/// Recognized keys for the CAPTCHA response token, in lookup order.
pub const CAPTCHA_FIELDS: [&str; 2] = ["h-captcha-response", "hcaptcha"];

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL: OnceLock<Regex> = OnceLock::new();

/// The user-visible fields of the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// Everything the endpoint extracts from one request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub fields: ContactFields,
    pub honeypot: String,
    pub captcha_token: String,
}

impl ContactSubmission {
    /// Any non-empty honeypot value marks automated traffic.
    pub fn is_bot(&self) -> bool {
        !self.honeypot.is_empty()
    }
}

/// Request body as handed over by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionBody {
    /// Raw `application/json` payload.
    Json(Vec<u8>),
    /// Decoded URL-encoded or multipart fields, in request order.
    Fields(Vec<(String, String)>),
    /// The HTTP layer could not decode the body at all.
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON body must be an object")]
    NotAnObject,
    #[error("malformed body: {0}")]
    Malformed(String),
}

impl SubmissionBody {
    pub fn parse(self) -> Result<ContactSubmission, BodyError> {
        match self {
            SubmissionBody::Json(bytes) => {
                let value: Value = serde_json::from_slice(&bytes)?;
                let object = value.as_object().ok_or(BodyError::NotAnObject)?;
                let field = |key: &str| object.get(key).map(json_text).unwrap_or_default();
                Ok(ContactSubmission {
                    fields: ContactFields::new(field("name"), field("email"), field("message")),
                    honeypot: field(HONEYPOT_FIELD),
                    captcha_token: first_non_empty(CAPTCHA_FIELDS.iter().map(|key| field(*key))),
                })
            }
            SubmissionBody::Fields(pairs) => {
                let field = |key: &str| {
                    pairs
                        .iter()
                        .find(|(k, _)| k == key)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default()
                };
                Ok(ContactSubmission {
                    fields: ContactFields::new(field("name"), field("email"), field("message")),
                    honeypot: field(HONEYPOT_FIELD),
                    captcha_token: first_non_empty(CAPTCHA_FIELDS.iter().map(|key| field(*key))),
                })
            }
            SubmissionBody::Malformed(reason) => Err(BodyError::Malformed(reason)),
        }
    }
}

/// Text of a JSON field. Falsy values (`null`, `false`, `0`, `""`) read as empty.
fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

fn first_non_empty(mut candidates: impl Iterator<Item = String>) -> String {
    candidates.find(|s| !s.is_empty()).unwrap_or_default()
}

/// Basic `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern"))
        .is_match(email)
}

/// Name, email and message must be non-empty after trimming, and the email well-formed.
pub fn validate_shape(fields: &ContactFields) -> Result<(), FailureReason> {
    let fields = fields.trimmed();
    if fields.name.is_empty() || fields.email.is_empty() || fields.message.is_empty() {
        return Err(FailureReason::MissingFields);
    }
    if !is_valid_email(&fields.email) {
        return Err(FailureReason::InvalidEmail);
    }
    Ok(())
}

pub fn require_captcha_token(token: &str) -> Result<(), FailureReason> {
    if token.trim().is_empty() {
        Err(FailureReason::CaptchaRequired)
    } else {
        Ok(())
    }
}

/// Escape text for interpolation into HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}
