//! HTTP surface for the contact relay: `POST /api/contact` and `GET /healthz`.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tozemoon_config::ServerConfig;
use tozemoon_contact::ContactPipeline;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod handlers;
mod request_tracing;

pub use request_tracing::request_id_for;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ContactPipeline>,
    pub max_body_bytes: usize,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(pipeline: ContactPipeline, server: &ServerConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            max_body_bytes: server.max_body_bytes,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/api/contact", post(handlers::contact_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .with_state(state)
}

/// Serve the router on `listener` until the process is stopped.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, build_router(state)).await
}

/// Parse a boolean environment flag, falling back to `default` when unset or unrecognized.
pub fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Install the global subscriber: `RUST_LOG` filter (default `info`), JSON lines when
/// `TOZEMOON_LOG_JSON` is set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("TOZEMOON_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
