//! HTTP server setup for the stage executor
//!
//! Router construction is split out so tests can drive the endpoints
//! without binding a socket.

use axum::{routing::get, Router};
use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::http::handlers::{handle_health, handle_not_found, handle_stage, AppState};
use crate::types::{Error, Result};

/// Start the HTTP server and block until shutdown
pub async fn start_server(
    listen: &str,
    state: AppState,
    request_timeout: Duration,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = parse_listen_address(listen)?;
    let router = create_router(Arc::new(state), request_timeout);

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        error!(error = %e, addr = %addr, "Failed to bind to address");
        Error::Io(e)
    })?;

    info!(
        local_addr = %listener.local_addr().unwrap_or(addr),
        "HTTP server listening"
    );

    let server = axum::serve(listener, router).with_graceful_shutdown(async {
        shutdown_signal.await;
        info!("Shutdown signal received, starting graceful shutdown");
    });

    if let Err(e) = server.await {
        error!(error = %e, "HTTP server error");
        return Err(Error::Io(e));
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Create the Axum router with all endpoints and middleware
///
/// The request timeout must exceed the command timeout, or long test runs
/// would be cut off at the HTTP layer first.
pub fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/test", get(handle_stage))
        .route("/health", get(handle_health))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Parse the listen address from configuration
fn parse_listen_address(listen: &str) -> Result<SocketAddr> {
    listen.parse().map_err(|e| {
        error!(listen_addr = %listen, error = %e, "Invalid listen address format");
        Error::Validation {
            field: "listen".to_string(),
            message: format!("invalid listen address '{listen}': {e}"),
        }
    })
}
