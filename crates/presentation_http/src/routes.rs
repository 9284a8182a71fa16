//! Route definitions

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, Method},
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::{handlers, state::AppState};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Reference transcription and typed scoring
        .route("/ipa", get(handlers::pronunciation::ipa))
        .route("/score", get(handlers::pronunciation::score))
        // Recorded attempts
        .route(
            "/audio-phonemes",
            post(handlers::pronunciation::audio_phonemes),
        )
        .route("/audio-score", post(handlers::pronunciation::audio_score))
        // Coaching
        .route("/llm-feedback", post(handlers::pronunciation::llm_feedback))
        .route("/feedback", post(handlers::pronunciation::rule_feedback))
        // Reference audio
        .route("/tts", post(handlers::pronunciation::tts))
        // Attach state
        .with_state(state)
}

/// Wrap the router with body limits, CORS, tracing and request ids
///
/// Layers added last run first, so the request id is set before the trace span opens.
pub fn apply_middleware(router: Router, server: &ServerConfig) -> Router {
    let router = router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(server.max_upload_bytes));

    let router = match cors_layer(server) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// CORS policy, or `None` when CORS is disabled
pub fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    if !server.cors_enabled {
        return None;
    }

    let layer = if server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };

    Some(layer)
}

fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri().path(),
    )
}
