//! Contact submission pipeline.
//!
//! The client stage ([`validate_shape`], [`require_captcha_token`], [`ContactClient`],
//! [`FormSession`]) is a UX convenience. The server stage ([`ContactPipeline`]) is the
//! authoritative gate: it parses the request body, drops honeypot traffic, re-validates the
//! fields, verifies the CAPTCHA token and hands a notification email to the mail provider.

pub mod captcha;
pub mod client;
pub mod form;
pub mod mailer;
pub mod pipeline;
pub mod result;
pub mod submission;

pub use captcha::{CaptchaError, CaptchaVerifier, HCaptchaVerifier, Verdict};
pub use client::ContactClient;
pub use form::{FormSession, Toast, ToastKind, ToastMessage};
pub use mailer::{MailError, Mailer, OutgoingEmail, ResendMailer, compose_notification};
pub use pipeline::{ContactPipeline, remote_ip_from_forwarded};
pub use result::{ContactResponse, FailureReason, SubmissionResult};
pub use submission::{
    BodyError, CAPTCHA_FIELDS, ContactFields, ContactSubmission, HONEYPOT_FIELD, SubmissionBody,
    escape_html, is_valid_email, require_captcha_token, validate_shape,
};
