//! Listener plumbing with graceful shutdown.

use axum::Router;
use tokio::net::TcpListener;

/// Serves `app` on `listener` until the process receives a shutdown
/// signal, then drains in-flight requests.
///
/// # Errors
///
/// Returns the underlying I/O error when serving fails.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown signal handler");
    }
    tracing::info!("shutdown signal received");
}
