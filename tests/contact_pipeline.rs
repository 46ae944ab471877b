use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tozemoon::config::ContactConfig;
use tozemoon::contact::{
    CaptchaError, CaptchaVerifier, ContactFields, ContactPipeline, ContactSubmission,
    FailureReason, MailError, Mailer, OutgoingEmail, SubmissionBody, SubmissionResult, Verdict,
};

enum VerifierMode {
    Accept,
    Reject,
    Broken,
}

struct CountingVerifier {
    mode: VerifierMode,
    calls: AtomicUsize,
}

#[async_trait]
impl CaptchaVerifier for CountingVerifier {
    async fn verify(&self, _token: &str, _remote_ip: &str) -> Result<Verdict, CaptchaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            VerifierMode::Accept => Ok(Verdict {
                success: true,
                error_codes: Vec::new(),
            }),
            VerifierMode::Reject => Ok(Verdict::default()),
            VerifierMode::Broken => Err(CaptchaError::Decode(
                serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
            )),
        }
    }
}

struct CountingMailer {
    fail: bool,
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for CountingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            Err(MailError::Rejected {
                status: 422,
                body: "invalid from".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn pipeline(
    mode: VerifierMode,
    mail_fails: bool,
) -> (ContactPipeline, Arc<CountingVerifier>, Arc<CountingMailer>) {
    let verifier = Arc::new(CountingVerifier {
        mode,
        calls: AtomicUsize::new(0),
    });
    let mailer = Arc::new(CountingMailer {
        fail: mail_fails,
        sent: Mutex::new(Vec::new()),
    });
    let pipeline =
        ContactPipeline::new(&ContactConfig::default(), verifier.clone(), mailer.clone());
    (pipeline, verifier, mailer)
}

fn submission(name: &str, email: &str, message: &str, honeypot: &str) -> ContactSubmission {
    ContactSubmission {
        fields: ContactFields::new(name, email, message),
        honeypot: honeypot.to_string(),
        captcha_token: "token".to_string(),
    }
}

#[tokio::test]
async fn honeypot_short_circuits_before_validation() {
    let (pipeline, verifier, mailer) = pipeline(VerifierMode::Accept, false);
    let result = pipeline
        .process(submission("", "junk", "", "x"), "1.2.3.4")
        .await;
    assert_eq!(result, SubmissionResult::Success);
    assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_email_is_a_400() {
    let (pipeline, verifier, _) = pipeline(VerifierMode::Accept, false);
    let result = pipeline
        .process(submission("Jane", "not-an-email", "hi", ""), "1.2.3.4")
        .await;
    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::InvalidEmail)
    );
    assert_eq!(result.http_status(), 400);
    assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_captcha_skips_dispatch() {
    let (pipeline, _, mailer) = pipeline(VerifierMode::Reject, false);
    let result = pipeline
        .process(submission("Jane", "jane@example.com", "hi", ""), "1.2.3.4")
        .await;
    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::CaptchaFailed)
    );
    assert_eq!(result.http_status(), 400);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn verifier_fault_is_captcha_error() {
    let (pipeline, _, mailer) = pipeline(VerifierMode::Broken, false);
    let result = pipeline
        .process(submission("Jane", "jane@example.com", "hi", ""), "1.2.3.4")
        .await;
    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::CaptchaError)
    );
    assert_eq!(result.http_status(), 500);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn dispatch_fault_is_send_failed() {
    let (pipeline, _, mailer) = pipeline(VerifierMode::Accept, true);
    let result = pipeline
        .process(submission("Jane", "jane@example.com", "hi", ""), "1.2.3.4")
        .await;
    assert_eq!(result, SubmissionResult::Failure(FailureReason::SendFailed));
    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn delivered_html_escapes_script_tags() {
    let (pipeline, verifier, mailer) = pipeline(VerifierMode::Accept, false);
    let result = pipeline
        .process(
            submission(
                " Jane ",
                "jane@example.com",
                "<script>alert('x')</script>",
                "",
            ),
            "1.2.3.4",
        )
        .await;
    assert_eq!(result, SubmissionResult::Success);
    assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    let sent = mailer.sent.lock().unwrap();
    assert!(sent[0].html.contains("&lt;script&gt;"));
    assert!(!sent[0].html.contains("<script>"));
    assert_eq!(sent[0].subject, "Nouveau message — Jane");
    assert_eq!(sent[0].to, ContactConfig::default().mail.to);
}

#[tokio::test]
async fn unparsable_body_is_invalid_body() {
    let (pipeline, verifier, _) = pipeline(VerifierMode::Accept, false);
    let result = pipeline
        .handle(SubmissionBody::Json(b"not json".to_vec()), None)
        .await;
    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::InvalidBody)
    );
    assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn submissions_are_independent() {
    let (pipeline, _, mailer) = pipeline(VerifierMode::Accept, false);
    for _ in 0..3 {
        let result = pipeline
            .process(
                submission("Jane", "jane@example.com", "same", ""),
                "1.2.3.4",
            )
            .await;
        assert!(result.is_success());
    }
    assert_eq!(mailer.sent.lock().unwrap().len(), 3);
}
