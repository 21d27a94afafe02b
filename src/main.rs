// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::application::monitor_service::MonitorService;
use crate::application::monitoring_session::MonitoringSession;
use crate::application::simulator_service::SimulatorService;
use crate::application::vitals_source::VitalsSource;
use crate::domain::classifier::Classifier;
use crate::infrastructure::config::{MonitorConfig, SourceKind, load_monitor_config};
use crate::infrastructure::memory_source::InMemoryVitalsSource;
use crate::infrastructure::realtime_database::RealtimeDatabaseSource;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::serve_until;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_monitor_config()?;

    // Create vitals source (infrastructure layer)
    let source = build_source(&config)?;

    // Create services (application layer)
    let session = MonitoringSession::new(
        Classifier::new(config.thresholds),
        config.history.capacity,
        config.waveform.sample_width,
    );
    let monitor_service = MonitorService::new(source, session, config.paths.clone());
    monitor_service.start()?;
    tracing::info!(
        "{} listeners registered, {}",
        monitor_service.active_listeners(),
        monitor_service.connection().as_str()
    );

    let simulator_service = SimulatorService::new(monitor_service.clone());
    let simulator_task = config.simulator.enabled.then(|| {
        tracing::info!("Simulator writing every {} ms", config.simulator.interval_ms);
        simulator_service
            .clone()
            .spawn_periodic(Duration::from_millis(config.simulator.interval_ms))
    });

    // Create application state
    let state = Arc::new(AppState {
        monitor_service,
        simulator_service,
    });

    // Start server (presentation layer)
    let addr: SocketAddr = config.server.bind_address.parse()?;
    tracing::info!("Starting vitals-monitor service on {}", addr);

    // Session ends with the server: listeners are torn down before
    // connections drain, so open dashboard streams close too
    serve_until(tokio::net::TcpListener::bind(addr).await?, state, shutdown_signal()).await?;

    if let Some(task) = simulator_task {
        task.abort();
    }

    Ok(())
}

fn build_source(config: &MonitorConfig) -> anyhow::Result<Arc<dyn VitalsSource>> {
    match config.source.kind {
        SourceKind::Memory => {
            tracing::info!("Using in-memory vitals source");
            Ok(Arc::new(InMemoryVitalsSource::new()))
        }
        SourceKind::Realtime => {
            let url = config
                .source
                .database_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("source.database_url is not set"))?;
            tracing::info!("Using realtime database at {}", url);
            Ok(Arc::new(RealtimeDatabaseSource::new(
                url,
                config.source.auth_token.clone(),
            )))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
