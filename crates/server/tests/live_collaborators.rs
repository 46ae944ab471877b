//! The HTTP collaborators against local stand-ins for the CAPTCHA and mail providers.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::Value;
use tozemoon_config::{ContactConfig, ServerConfig};
use tozemoon_contact::{
    ContactClient, ContactFields, ContactPipeline, FailureReason, SubmissionBody, SubmissionResult,
};
use tozemoon_server::{AppState, build_router};

#[derive(Clone, Copy)]
enum VerifyMode {
    Accept,
    Reject,
    Html,
}

#[derive(Clone, Copy)]
enum MailMode {
    Accept,
    Reject,
}

struct Upstream {
    verify: VerifyMode,
    mail: MailMode,
    verify_bodies: Mutex<Vec<String>>,
    mail_bodies: Mutex<Vec<Value>>,
    mail_auth: Mutex<Vec<String>>,
}

impl Upstream {
    fn new(verify: VerifyMode, mail: MailMode) -> Arc<Self> {
        Arc::new(Self {
            verify,
            mail,
            verify_bodies: Mutex::new(Vec::new()),
            mail_bodies: Mutex::new(Vec::new()),
            mail_auth: Mutex::new(Vec::new()),
        })
    }

    fn verify_bodies(&self) -> Vec<String> {
        self.verify_bodies.lock().expect("lock").clone()
    }

    fn mail_bodies(&self) -> Vec<Value> {
        self.mail_bodies.lock().expect("lock").clone()
    }
}

async fn siteverify(State(upstream): State<Arc<Upstream>>, body: String) -> Response {
    upstream.verify_bodies.lock().expect("lock").push(body);
    match upstream.verify {
        VerifyMode::Accept => json_response(StatusCode::OK, r#"{"success":true}"#),
        VerifyMode::Reject => json_response(
            StatusCode::OK,
            r#"{"success":false,"error-codes":["invalid-input-response"]}"#,
        ),
        VerifyMode::Html => (
            StatusCode::BAD_GATEWAY,
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body>bad gateway</body></html>",
        )
            .into_response(),
    }
}

async fn emails(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    upstream.mail_auth.lock().expect("lock").push(auth);
    let parsed = serde_json::from_str(&body).expect("mail body is json");
    upstream.mail_bodies.lock().expect("lock").push(parsed);
    match upstream.mail {
        MailMode::Accept => json_response(StatusCode::OK, r#"{"id":"msg_1"}"#),
        MailMode::Reject => json_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"name":"validation_error","message":"invalid from"}"#,
        ),
    }
}

fn json_response(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, router).await.expect("serve") });
    addr
}

async fn start_upstream(upstream: Arc<Upstream>) -> SocketAddr {
    let router = Router::new()
        .route("/siteverify", post(siteverify))
        .route("/emails", post(emails))
        .with_state(upstream);
    spawn(router).await
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("http client")
}

fn pipeline_against(addr: SocketAddr) -> ContactPipeline {
    let mut config = ContactConfig::default();
    config.captcha.verify_url = format!("http://{addr}/siteverify");
    config.captcha.secret = "s3cret".to_string();
    config.captcha.site_key = "site".to_string();
    config.mail.api_url = format!("http://{addr}/emails");
    config.mail.api_key = "re_key".to_string();
    ContactPipeline::live(&config).expect("live pipeline")
}

fn json_body(message: &str) -> SubmissionBody {
    let payload = serde_json::json!({
        "name": "Jane <Doe>",
        "email": "jane@example.com",
        "message": message,
        "_company": "",
        "h-captcha-response": "tok",
    });
    SubmissionBody::Json(serde_json::to_vec(&payload).expect("encode"))
}

#[tokio::test]
async fn verifier_posts_the_form_and_mailer_posts_the_notification() {
    let upstream = Upstream::new(VerifyMode::Accept, MailMode::Accept);
    let addr = start_upstream(upstream.clone()).await;
    let pipeline = pipeline_against(addr);

    let result = pipeline
        .handle(json_body("<b>hello</b>"), Some("1.2.3.4, 10.0.0.1"))
        .await;
    assert_eq!(result, SubmissionResult::Success);

    let form = "secret=s3cret&response=tok&sitekey=site&remoteip=1.2.3.4";
    assert_eq!(upstream.verify_bodies(), vec![form.to_string()]);
    let mails = upstream.mail_bodies();
    assert_eq!(mails.len(), 1);
    let mail = &mails[0];
    assert_eq!(mail["reply_to"], "jane@example.com");
    assert_eq!(mail["to"], ContactConfig::default().mail.to);
    assert_eq!(mail["subject"], "Nouveau message — Jane <Doe>");
    let html = mail["html"].as_str().expect("html part");
    assert!(html.contains("&lt;b&gt;hello&lt;/b&gt;"));
    assert!(html.contains("Jane &lt;Doe&gt;"));
    assert!(!html.contains("<b>"));
    assert_eq!(
        *upstream.mail_auth.lock().expect("lock"),
        vec!["Bearer re_key".to_string()]
    );
}

#[tokio::test]
async fn html_from_the_verifier_is_a_captcha_error_and_sends_nothing() {
    let upstream = Upstream::new(VerifyMode::Html, MailMode::Accept);
    let addr = start_upstream(upstream.clone()).await;
    let pipeline = pipeline_against(addr);

    let result = pipeline.handle(json_body("hi"), None).await;
    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::CaptchaError)
    );
    assert_eq!(upstream.verify_bodies().len(), 1);
    assert!(upstream.mail_bodies().is_empty());
}

#[tokio::test]
async fn rejected_token_is_a_captcha_failure() {
    let upstream = Upstream::new(VerifyMode::Reject, MailMode::Accept);
    let addr = start_upstream(upstream.clone()).await;
    let pipeline = pipeline_against(addr);

    let result = pipeline.handle(json_body("hi"), None).await;
    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::CaptchaFailed)
    );
    assert!(upstream.mail_bodies().is_empty());
}

#[tokio::test]
async fn provider_rejection_is_a_send_failure() {
    let upstream = Upstream::new(VerifyMode::Accept, MailMode::Reject);
    let addr = start_upstream(upstream.clone()).await;
    let pipeline = pipeline_against(addr);

    let result = pipeline.handle(json_body("hi"), None).await;
    assert_eq!(result, SubmissionResult::Failure(FailureReason::SendFailed));
    assert_eq!(upstream.mail_bodies().len(), 1);
}

#[tokio::test]
async fn client_round_trips_through_the_endpoint() {
    let accepting = Upstream::new(VerifyMode::Accept, MailMode::Accept);
    let upstream_addr = start_upstream(accepting.clone()).await;
    let state = AppState::new(pipeline_against(upstream_addr), &ServerConfig::default());
    let endpoint = spawn(build_router(state)).await;
    let client = ContactClient::new(http_client(), format!("http://{endpoint}/api/contact"));

    let fields = ContactFields::new("  Jane ", "jane@example.com", "hello");
    assert_eq!(
        client.submit(&fields, "tok").await,
        SubmissionResult::Success
    );
    let mails = accepting.mail_bodies();
    assert_eq!(mails.len(), 1);
    assert_eq!(
        mails[0]["text"],
        "Nom: Jane\nEmail: jane@example.com\n\nhello"
    );
    let form = &accepting.verify_bodies()[0];
    assert!(form.contains("response=tok"));

    let rejecting = Upstream::new(VerifyMode::Reject, MailMode::Accept);
    let upstream_addr = start_upstream(rejecting.clone()).await;
    let state = AppState::new(pipeline_against(upstream_addr), &ServerConfig::default());
    let endpoint = spawn(build_router(state)).await;
    let client = ContactClient::new(http_client(), format!("http://{endpoint}/api/contact"));
    assert_eq!(
        client.submit(&fields, "tok").await,
        SubmissionResult::Failure(FailureReason::CaptchaFailed)
    );
    assert!(rejecting.mail_bodies().is_empty());
}
