//! Axum gateway: the HTTP surface the browser UI talks to. JSON endpoints
//! per capability, SSE for reconciled summary deltas, and an availability
//! report the UI uses to grey out actions.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::StreamExt;
use glossa_core::{
    Availability, CapabilityError, CapabilityKind, CapabilityRequest, CapabilityService,
    GlossaConfig, HttpDetectionFallback, SimulatedHost,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Deserialize)]
struct TranslateBody {
    text: String,
    target: String,
}

#[derive(Deserialize)]
struct TextBody {
    text: String,
}

#[derive(Deserialize)]
struct SummarizeQuery {
    #[serde(default)]
    stream: bool,
}

#[derive(Serialize)]
struct ResultBody {
    result: String,
}

#[derive(Serialize)]
struct DeltaEvent {
    delta: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

fn error_response(err: CapabilityError) -> Response {
    let status = match &err {
        CapabilityError::InvalidInput(_) | CapabilityError::InvalidParams(_) => {
            StatusCode::BAD_REQUEST
        }
        CapabilityError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CapabilityError::SessionCreation(_)
        | CapabilityError::Invocation(_)
        | CapabilityError::Detection(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorBody {
            error: err.kind(),
            message: err.to_string(),
        }),
    )
        .into_response()
}

fn result_response(outcome: Result<String, CapabilityError>) -> Response {
    match outcome {
        Ok(result) => Json(ResultBody { result }).into_response(),
        Err(err) => error_response(err),
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn capabilities(State(service): State<Arc<CapabilityService>>) -> Response {
    Json(service.availability_report().await).into_response()
}

async fn translate(
    State(service): State<Arc<CapabilityService>>,
    Json(body): Json<TranslateBody>,
) -> Response {
    result_response(
        service
            .request(CapabilityRequest::Translate {
                input: body.text,
                target: body.target,
            })
            .await,
    )
}

async fn detect(
    State(service): State<Arc<CapabilityService>>,
    Json(body): Json<TextBody>,
) -> Response {
    result_response(
        service
            .request(CapabilityRequest::DetectLanguage { input: body.text })
            .await,
    )
}

async fn summarize(
    State(service): State<Arc<CapabilityService>>,
    Query(query): Query<SummarizeQuery>,
    Json(body): Json<TextBody>,
) -> Response {
    if !query.stream {
        return result_response(
            service
                .request(CapabilityRequest::Summarize {
                    input: body.text,
                    stream: false,
                })
                .await,
        );
    }
    match service.summarizer().summarize_stream(&body.text).await {
        Ok(deltas) => {
            let events = deltas.map(|delta| match delta {
                Ok(chunk) => Event::default().json_data(DeltaEvent { delta: chunk }),
                Err(err) => Event::default().event("error").json_data(ErrorBody {
                    error: err.kind(),
                    message: err.to_string(),
                }),
            });
            Sse::new(events)
                .keep_alive(KeepAlive::default())
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

fn app(service: Arc<CapabilityService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/api/health", get(health))
        .route("/api/capabilities", get(capabilities))
        .route("/api/translate", post(translate))
        .route("/api/summarize", post(summarize))
        .route("/api/detect", post(detect))
        .layer(cors)
        .with_state(service)
}

fn kind_from_str(value: &str) -> Option<CapabilityKind> {
    match value {
        "translate" => Some(CapabilityKind::Translate),
        "summarize" => Some(CapabilityKind::Summarize),
        "detect-language" => Some(CapabilityKind::DetectLanguage),
        _ => None,
    }
}

/// Simulated host shaped by `GLOSSA_SIM_*` env knobs. A real on-device
/// provider would be wired in here instead.
fn host_from_env() -> SimulatedHost {
    let mut host = SimulatedHost::new();
    if let Ok(ms) = std::env::var("GLOSSA_SIM_DOWNLOAD_MS") {
        if let Ok(ms) = ms.parse::<u64>() {
            host = host.with_download_delay(Duration::from_millis(ms));
        }
    }
    if let Ok(ms) = std::env::var("GLOSSA_SIM_STREAM_MS") {
        if let Ok(ms) = ms.parse::<u64>() {
            host = host.with_stream_delay(Duration::from_millis(ms));
        }
    }
    if let Ok(kinds) = std::env::var("GLOSSA_SIM_DOWNLOADING") {
        for name in kinds.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match kind_from_str(name) {
                Some(kind) => host = host.with_availability(kind, Availability::AfterDownload),
                None => warn!(name, "unknown capability kind in GLOSSA_SIM_DOWNLOADING"),
            }
        }
    }
    if let Ok(kinds) = std::env::var("GLOSSA_SIM_UNAVAILABLE") {
        for name in kinds.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match kind_from_str(name) {
                Some(kind) => host = host.with_availability(kind, Availability::Unavailable),
                None => warn!(name, "unknown capability kind in GLOSSA_SIM_UNAVAILABLE"),
            }
        }
    }
    host
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[glossa-gateway] .env not loaded: {} (using system environment)", e);
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,glossa_core=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GlossaConfig::from_env();
    let host = Arc::new(host_from_env());
    let fallback = Arc::new(HttpDetectionFallback::new(&config.fallback));
    let service = Arc::new(CapabilityService::new(host, fallback, config));

    let bind = std::env::var("GLOSSA_BIND").unwrap_or_else(|_| "127.0.0.1:8787".to_string());
    let listener = tokio::net::TcpListener::bind(&bind).await.unwrap();
    info!(%bind, "glossa gateway listening");
    axum::serve(listener, app(service)).await.unwrap();
}
