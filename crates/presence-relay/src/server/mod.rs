//! Server setup and process wiring
//!
//! Builds the store, the change detector task and the notification
//! dispatcher, serves the read API, and coordinates shutdown.

use std::sync::Arc;

use axum::Router;
use presence_common::{AppConfig, AppError, AppResult};
use presence_core::DomainError;
use presence_service::{
    shutdown_channel, spawn_dispatcher, ChangeDetector, DetectorSettings, ServiceContext, Shutdown,
};
use presence_store::{InfluxConnection, InfluxStore};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::sinks::create_sink;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router);
    router.with_state(state)
}

/// Serve `app` until `shutdown` fires, then finish in-flight requests
pub async fn serve(listener: TcpListener, app: Router, mut shutdown: Shutdown) -> AppResult<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("server error: {e}")))
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => {
            warn!(error = %e, "Unable to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}

/// Run the relay with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let (trigger, shutdown) = shutdown_channel();

    let connection = InfluxConnection::from_config(&config.influx);
    info!(url = %connection.url, bucket = %connection.bucket, "Using InfluxDB store");
    let store = InfluxStore::new(connection).map_err(DomainError::from)?;
    let ctx = ServiceContext::new(Arc::new(store)).with_shutdown(shutdown.clone());

    if let Err(e) = ctx.health_check().await {
        warn!(error = %e, "Store is not reachable yet, polling will retry");
    }

    let sink = create_sink(&config.notify)
        .map_err(|e| AppError::ExternalService(format!("notification sink: {e}")))?;
    let (detector, rx) = ChangeDetector::new(ctx.clone(), DetectorSettings::from(&config));
    let counters = detector.counters();
    let dispatcher = spawn_dispatcher(rx, sink);
    let detector_task = tokio::spawn(detector.run(shutdown.clone()));

    let address = config.api.address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to bind {address}: {e}")))?;
    let app = create_app(AppState::new(ctx, config));

    let server = serve(listener, app, shutdown);
    tokio::pin!(server);
    let result = tokio::select! {
        result = &mut server => result,
        () = ctrl_c() => {
            trigger.trigger();
            server.await
        }
    };
    // Server may have stopped on its own
    trigger.trigger();

    if let Err(e) = detector_task.await {
        error!(error = %e, "Change detector task panicked");
    }
    match dispatcher.await {
        Ok(stats) => info!(
            delivered = stats.delivered,
            failed = stats.failed,
            dropped_overflow = counters.dropped_overflow(),
            dropped_malformed = counters.dropped_malformed(),
            "Relay stopped"
        ),
        Err(e) => error!(error = %e, "Dispatcher task panicked"),
    }

    result
}
