mod config;
mod http;
mod telemetry;

use config::ServiceConfig;
use std::sync::Arc;
use stu_domain::{BatchIngestService, InMemoryRecordStore};
use telemetry::{init_telemetry, TelemetryConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize configuration and tracing
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_telemetry(&TelemetryConfig {
        log_level: config.log_level.clone(),
    });

    info!(addr = %config.listen_addr(), "starting stu-ingest service");

    // Deployments with a durable document store plug their own RecordStore
    // implementation in here
    let store = Arc::new(InMemoryRecordStore::new());
    let service = Arc::new(BatchIngestService::new(store));

    let listener = match tokio::net::TcpListener::bind(config.listen_addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.listen_addr(), "failed to bind listener: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, http::router(service)).await {
        error!("server error: {}", e);
        std::process::exit(1);
    }
}
