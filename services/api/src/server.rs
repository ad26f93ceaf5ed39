use crate::cli::ServeArgs;
use crate::infra::{AppState, PersistedStore};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use school_connect::api::ApiState;
use school_connect::config::AppConfig;
use school_connect::error::AppError;
use school_connect::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data_file) = args.data_file.take() {
        config.storage.data_file = Some(data_file);
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let persisted = PersistedStore::open(config.storage.data_file.clone())?;
    if let Ok(counts) = persisted.store.row_counts() {
        let rows: usize = counts.values().sum();
        info!(rows, tables = counts.len(), "store ready");
    }
    if config.auth.credentials.is_empty() {
        warn!("APP_AUTH_TOKENS is empty; every caller is anonymous");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let api_state = ApiState::from_config(&config, persisted.store.clone());
    let app = with_operational_routes(api_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, site = %config.site.name, "school connect api ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    readiness_flag.store(false, Ordering::Release);
    info!(snapshot = ?persisted.path(), "shutting down");
    persisted.persist()?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
