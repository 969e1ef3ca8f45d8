//! HTTP ingress: every `POST`, on any path, is one push from one cluster.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, Router};
use tokio::{net::TcpListener, signal};
use tower_http::timeout::TimeoutLayer;

use crate::enrich::ContextBuilder;
use crate::error::Result;
use crate::forward::Forwarder;

pub use handlers::ingest;

/// Header carrying the identifier of the pushing cluster.
pub const CLUSTER_ID_HEADER: &str = "x-cluster-id";

/// Read-only state shared by all requests.
pub struct AppState {
    pub contexts: ContextBuilder,
    pub forwarder: Arc<dyn Forwarder>,
}

pub fn router(state: AppState, request_timeout: Duration, max_body_size: usize) -> Router {
    Router::new()
        .fallback(ingest)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(Arc::new(state))
}

/// Runs the server until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| ("server failed", e))?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
