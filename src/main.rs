//! aquasense-gateway server entry point.
//!
//! Loads configuration, picks the storage backend and push channel, starts
//! the retention purge and serves the REST API.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use aquasense_gateway::api;
use aquasense_gateway::app_state::AppState;
use aquasense_gateway::config::GatewayConfig;
use aquasense_gateway::domain::{Clock, SystemClock};
use aquasense_gateway::notify::{LineNotifier, LogNotifier, PushNotifier};
use aquasense_gateway::persistence::{MeasurementStore, MemoryStore, PostgresStore, SnapshotStore};
use aquasense_gateway::service::retention::spawn_purge_task;
use aquasense_gateway::service::{ReportService, SensorService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;
    init_tracing(config.log_json);
    tracing::info!(addr = %config.listen_addr, "starting aquasense-gateway");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Storage backend
    let (store, snapshots): (Arc<dyn MeasurementStore>, Arc<dyn SnapshotStore>) =
        if config.persistence_enabled {
            let pg = Arc::new(
                PostgresStore::connect(&config, Arc::clone(&clock))
                    .await
                    .context("connecting to PostgreSQL")?,
            );
            tracing::info!("using PostgreSQL persistence");
            (Arc::clone(&pg) as Arc<dyn MeasurementStore>, pg as Arc<dyn SnapshotStore>)
        } else {
            let mem = Arc::new(MemoryStore::with_retention(
                Arc::clone(&clock),
                config.retention,
            ));
            tracing::warn!("persistence disabled; readings are kept in memory only");
            (Arc::clone(&mem) as Arc<dyn MeasurementStore>, mem as Arc<dyn SnapshotStore>)
        };

    // Push channel
    let notifier: Arc<dyn PushNotifier> = match &config.line_channel_access_token {
        Some(token) => {
            if config.line_target_id.is_none() {
                tracing::warn!("LINE_USER_ID is not set; alerts will be rejected by LINE");
            }
            Arc::new(LineNotifier::new(reqwest::Client::new(), token.clone()))
        }
        None => Arc::new(LogNotifier),
    };

    let sensor_service = Arc::new(SensorService::from_config(
        &config,
        Arc::clone(&clock),
        Arc::clone(&store),
        Arc::clone(&snapshots),
        notifier,
    ));
    let report_service = Arc::new(ReportService::new(
        snapshots,
        clock,
        config.report_utc_offset_hours,
    ));

    let purge = spawn_purge_task(store, config.retention_purge_interval_secs);

    let app = api::build_app(AppState {
        sensor_service,
        report_service,
    });

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;
    purge.abort();

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
