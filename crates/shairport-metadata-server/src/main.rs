//! Shairport metadata server entry point.
//!
//! Subscribes to the MQTT topics Shairport Sync publishes and serves the
//! current now-playing state over HTTP for display clients.
//!
//! # Architecture
//!
//! ```text
//! MQTT broker --> MqttSource --> Ingestor --> StateStore <-- Axum handlers <-- HTTP clients
//! ```
//!
//! The ingest loop runs on its own Tokio task for the lifetime of the
//! process. The HTTP server runs on the main task until Ctrl-C or
//! SIGTERM, then the ingest task is aborted. Nothing is persisted.

mod config;
mod error;
mod mqtt;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use shairport_metadata_api::{AppState, start_server};
use shairport_metadata_core::{Ingestor, StateStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::BridgeConfig;
use crate::mqtt::MqttSource;

/// Application entry point.
///
/// Parses configuration, initializes logging, starts the MQTT ingest
/// task, then serves HTTP until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the HTTP server
/// cannot bind.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BridgeConfig::parse();
    init_tracing(&config);

    config.validate().context("invalid configuration")?;

    let mqtt_settings = config.mqtt_settings();
    let server_config = config.server_config();

    info!("shairport-metadata-server starting");
    info!(
        host = mqtt_settings.host,
        port = mqtt_settings.port,
        prefix = mqtt_settings.topic_prefix,
        client_id = mqtt_settings.client_id,
        authenticated = mqtt_settings.credentials.is_some(),
        "MQTT configuration"
    );
    info!(
        host = server_config.host,
        port = server_config.port,
        "HTTP configuration"
    );

    let store = Arc::new(StateStore::new());
    let ingestor = Ingestor::new(&mqtt_settings.topic_prefix, Arc::clone(&store));
    let source = MqttSource::new(&mqtt_settings);

    let ingest_task = tokio::spawn(async move {
        let stats = ingestor.run(source.into_stream()).await;
        // The stream reconnects forever, so this only fires on a bug. HTTP
        // keeps serving the last snapshot rather than taking the process down.
        error!(
            applied = stats.applied,
            ignored = stats.ignored,
            failed = stats.failed,
            "MQTT event stream ended; serving last known state"
        );
    });

    let state = Arc::new(AppState::new(store));
    let served = start_server(&server_config, state, shutdown_signal()).await;

    ingest_task.abort();
    served.context("query server failed")?;

    info!("shairport-metadata-server stopped");
    Ok(())
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `--debug`.
fn init_tracing(config: &BridgeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received");
}
