//! Server-side submission gate.

use std::sync::Arc;

use reqwest::Client;
use tozemoon_config::{ContactConfig, MailConfig};
use tracing::{debug, error, info, warn};

use crate::captcha::{CaptchaVerifier, HCaptchaVerifier};
use crate::mailer::{Mailer, ResendMailer, compose_notification};
use crate::result::{FailureReason, SubmissionResult};
use crate::submission::{ContactSubmission, SubmissionBody, is_valid_email};

/// First entry of an `x-forwarded-for` header, or `fallback` when absent or blank.
pub fn remote_ip_from_forwarded(header: Option<&str>, fallback: &str) -> String {
    header
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Authoritative contact gate. Holds no per-request state; one instance serves every request.
#[derive(Clone)]
pub struct ContactPipeline {
    captcha: Arc<dyn CaptchaVerifier>,
    mailer: Arc<dyn Mailer>,
    mail: MailConfig,
    fallback_remote_ip: String,
}

impl ContactPipeline {
    pub fn new(
        config: &ContactConfig,
        captcha: Arc<dyn CaptchaVerifier>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            captcha,
            mailer,
            mail: config.mail.clone(),
            fallback_remote_ip: config.fallback_remote_ip.clone(),
        }
    }

    /// Pipeline talking to hCaptcha and Resend over one shared HTTP client.
    pub fn live(config: &ContactConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("tozemoon/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(
            config,
            Arc::new(HCaptchaVerifier::new(client.clone(), &config.captcha)),
            Arc::new(ResendMailer::new(client, &config.mail)),
        ))
    }

    /// Run a raw request body through the gate.
    pub async fn handle(
        &self,
        body: SubmissionBody,
        forwarded_for: Option<&str>,
    ) -> SubmissionResult {
        match body.parse() {
            Ok(submission) => {
                let remote_ip = remote_ip_from_forwarded(forwarded_for, &self.fallback_remote_ip);
                self.process(submission, &remote_ip).await
            }
            Err(err) => {
                warn!(
                    reason = %FailureReason::InvalidBody,
                    error = %err,
                    "contact submission rejected"
                );
                SubmissionResult::Failure(FailureReason::InvalidBody)
            }
        }
    }

    /// Run an already-parsed submission through the honeypot, validation, CAPTCHA and dispatch.
    pub async fn process(
        &self,
        submission: ContactSubmission,
        remote_ip: &str,
    ) -> SubmissionResult {
        if submission.is_bot() {
            debug!(remote_ip, "honeypot filled, submission discarded");
            return SubmissionResult::Success;
        }

        let fields = submission.fields.trimmed();
        if fields.name.is_empty() || fields.email.is_empty() || fields.message.is_empty() {
            return reject(FailureReason::MissingFields);
        }
        if !is_valid_email(&fields.email) {
            return reject(FailureReason::InvalidEmail);
        }

        let token = &submission.captcha_token;
        match self.captcha.verify(token, remote_ip).await {
            Ok(verdict) if verdict.success => {}
            Ok(verdict) => {
                warn!(
                    reason = %FailureReason::CaptchaFailed,
                    codes = ?verdict.error_codes,
                    "contact submission rejected"
                );
                return SubmissionResult::Failure(FailureReason::CaptchaFailed);
            }
            Err(err) => {
                error!(error = %err, "captcha verification unavailable");
                return SubmissionResult::Failure(FailureReason::CaptchaError);
            }
        }

        let email = compose_notification(&self.mail, &fields);
        match self.mailer.send(&email).await {
            Ok(()) => {
                info!(remote_ip, "contact submission delivered");
                SubmissionResult::Success
            }
            Err(err) => {
                error!(error = %err, "contact notification dispatch failed");
                SubmissionResult::Failure(FailureReason::SendFailed)
            }
        }
    }
}

fn reject(reason: FailureReason) -> SubmissionResult {
    warn!(%reason, "contact submission rejected");
    SubmissionResult::Failure(reason)
}
