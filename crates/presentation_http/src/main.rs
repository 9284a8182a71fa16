//! Prononce HTTP Server
//!
//! Main entry point for the pronunciation tutoring API.

use std::time::Duration;

use anyhow::Context;
use application::PronunciationService;
use infrastructure::{AppConfig, build_providers, init_telemetry};
use presentation_http::{
    AppState, Drain, apply_middleware, create_router, run_until_drained, set_expose_internal_errors,
    shutdown_signal,
};
use tokio::{net::TcpListener, sync::oneshot};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration errors are fatal, including unknown provider names
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_telemetry(&config.telemetry, config.server.log_format)
        .context("Failed to initialize logging")?;

    info!("🗣️ Prononce v{} starting...", env!("CARGO_PKG_VERSION"));

    set_expose_internal_errors(config.server.expose_internal_errors);

    info!(
        host = %config.server.host,
        port = %config.server.port,
        transcription = %config.providers.transcription,
        phonemizer = %config.providers.phonemizer,
        feedback = %config.providers.feedback,
        synthesis = %config.providers.synthesis,
        "Configuration loaded"
    );

    // Providers are built once and shared by every request
    let providers = build_providers(&config)
        .await
        .context("Failed to initialize providers")?;
    let service = PronunciationService::new(providers, config.tutor.service_config());

    let app = apply_middleware(create_router(AppState::new(service)), &config.server);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    let (draining_tx, draining_rx) = oneshot::channel();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(draining_tx))
        .into_future();

    match run_until_drained(server, draining_rx, shutdown_timeout).await? {
        Drain::Completed => info!("👋 Server shutdown complete"),
        Drain::TimedOut => info!("👋 Server shutdown forced after timeout"),
    }

    Ok(())
}
