//! SellCar Web Server - Framer form webhook receiver.
//!
//! This binary:
//! - Receives form submissions from Framer
//! - Verifies the webhook signature (or the developer bypass)
//! - Enriches the submission with a DVLA vehicle lookup
//! - Emails the rendered submission through Resend

use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sellcar::{router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env().context("Invalid configuration")?;
    info!(
        port = config.port,
        framer_secret_configured = config.framer_webhook_secret.is_some(),
        dev_bypass_enabled = config.dev_bypass_secret.is_some(),
        dvla_api_key_configured = !config.dvla_api_key.is_empty(),
        dvla_api_url = %config.dvla_api_url,
        resend_api_url = %config.resend_api_url,
        template_path = ?config.template_path,
        lookup_timeout_ms = config.lookup_timeout_ms,
        email_timeout_ms = config.email_timeout_ms,
        "config_loaded"
    );

    if config.framer_webhook_secret.is_none() {
        warn!("framer_secret_not_configured_all_signed_requests_rejected");
    }

    let http = Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    // Create application state
    let port = config.port;
    let state = AppState::new(config, http).context("Failed to load email template")?;

    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
