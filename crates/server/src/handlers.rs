use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use tozemoon_contact::{SubmissionBody, SubmissionResult};
use tracing::debug;

use crate::AppState;

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

pub(crate) async fn contact_handler(State(state): State<AppState>, request: Request) -> Response {
    let forwarded_for = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let body = read_submission_body(request, &state).await;
    let result = state.pipeline.handle(body, forwarded_for.as_deref()).await;
    respond(result)
}

fn respond(result: SubmissionResult) -> Response {
    let status =
        StatusCode::from_u16(result.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(result.to_response())).into_response()
}

/// Decode the body according to its content type. JSON stays raw for the pipeline to parse;
/// URL-encoded and multipart bodies become field lists.
async fn read_submission_body(request: Request, state: &AppState) -> SubmissionBody {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.contains("application/json") {
        return match Bytes::from_request(request, state).await {
            Ok(bytes) => SubmissionBody::Json(bytes.to_vec()),
            Err(rejection) => SubmissionBody::Malformed(rejection.body_text()),
        };
    }
    if content_type.starts_with("application/x-www-form-urlencoded") {
        return match Form::<Vec<(String, String)>>::from_request(request, state).await {
            Ok(Form(pairs)) => SubmissionBody::Fields(pairs),
            Err(rejection) => SubmissionBody::Malformed(rejection.body_text()),
        };
    }
    if content_type.starts_with("multipart/form-data") {
        return match Multipart::from_request(request, state).await {
            Ok(multipart) => read_multipart(multipart).await,
            Err(rejection) => SubmissionBody::Malformed(rejection.body_text()),
        };
    }
    debug!(content_type, "unsupported contact body content type");
    SubmissionBody::Malformed(format!("unsupported content type `{content_type}`"))
}

async fn read_multipart(mut multipart: Multipart) -> SubmissionBody {
    let mut pairs = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_string();
                match field.text().await {
                    Ok(value) => pairs.push((name, value)),
                    Err(err) => return SubmissionBody::Malformed(err.body_text()),
                }
            }
            Ok(None) => return SubmissionBody::Fields(pairs),
            Err(err) => return SubmissionBody::Malformed(err.body_text()),
        }
    }
}
