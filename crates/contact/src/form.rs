//! State of one contact form instance as the UI sees it.

use crate::result::{FailureReason, SubmissionResult};
use crate::submission::{ContactFields, require_captcha_token, validate_shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Localized message keys shown in the form toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastMessage {
    Success,
    Required,
    Email,
    Captcha,
    Network,
    Generic,
}

impl ToastMessage {
    pub fn key(&self) -> &'static str {
        match self {
            ToastMessage::Success => "toast.success",
            ToastMessage::Required => "toast.required",
            ToastMessage::Email => "toast.email",
            ToastMessage::Captcha => "toast.captcha",
            ToastMessage::Network => "toast.network",
            ToastMessage::Generic => "toast.generic",
        }
    }

    pub fn for_failure(reason: FailureReason) -> Self {
        match reason {
            FailureReason::CaptchaFailed | FailureReason::CaptchaRequired => ToastMessage::Captcha,
            FailureReason::InvalidEmail => ToastMessage::Email,
            FailureReason::MissingFields => ToastMessage::Required,
            FailureReason::CaptchaError | FailureReason::Network => ToastMessage::Network,
            FailureReason::InvalidBody
            | FailureReason::SendFailed
            | FailureReason::Unrecognized => ToastMessage::Generic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: ToastMessage,
}

impl Toast {
    fn error(message: ToastMessage) -> Self {
        Self {
            kind: ToastKind::Error,
            message,
        }
    }
}

/// Contact form session: CAPTCHA token, widget reset key, in-flight flag and current toast.
///
/// Bumping `widget_key` tells the UI to mount a fresh CAPTCHA widget; a used token can never be
/// redeemed twice, so every finished submission bumps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSession {
    captcha_token: Option<String>,
    widget_key: u64,
    in_flight: bool,
    toast: Option<Toast>,
    fields_cleared: bool,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captcha_token(&self) -> Option<&str> {
        self.captcha_token.as_deref()
    }

    pub fn widget_key(&self) -> u64 {
        self.widget_key
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn toast(&self) -> Option<Toast> {
        self.toast
    }

    /// True once a successful submission asked the UI to clear its inputs.
    pub fn fields_cleared(&self) -> bool {
        self.fields_cleared
    }

    pub fn on_captcha_verified(&mut self, token: impl Into<String>) {
        self.captcha_token = Some(token.into());
    }

    pub fn on_captcha_expired(&mut self) {
        self.captcha_token = None;
    }

    pub fn on_captcha_error(&mut self) {
        self.toast = Some(Toast::error(ToastMessage::Network));
        self.reset_widget();
    }

    /// Validate locally and, if the form may be sent, mark it in flight and return the token.
    ///
    /// Returns `None` while another submission is in flight or when local validation fails (the
    /// toast then says why).
    pub fn begin_submit(&mut self, fields: &ContactFields) -> Option<String> {
        if self.in_flight {
            return None;
        }
        self.toast = None;
        self.fields_cleared = false;
        let token = self.captcha_token.clone().unwrap_or_default();
        let checked = validate_shape(fields).and_then(|()| require_captcha_token(&token));
        if let Err(reason) = checked {
            self.toast = Some(Toast::error(ToastMessage::for_failure(reason)));
            return None;
        }
        self.in_flight = true;
        Some(token)
    }

    /// Record the outcome of the submission started by [`FormSession::begin_submit`].
    pub fn finish_submit(&mut self, result: SubmissionResult) {
        self.in_flight = false;
        self.toast = Some(match result {
            SubmissionResult::Success => {
                self.fields_cleared = true;
                Toast {
                    kind: ToastKind::Success,
                    message: ToastMessage::Success,
                }
            }
            SubmissionResult::Failure(reason) => Toast::error(ToastMessage::for_failure(reason)),
        });
        self.reset_widget();
    }

    fn reset_widget(&mut self) {
        self.captcha_token = None;
        self.widget_key += 1;
    }
}
