//! HTTP server startup with graceful shutdown.

mod shutdown;

use std::net::SocketAddr;

use axum::Router;
use shutdown::shutdown_signal;

use crate::config::ServerConfig;

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "pathway_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "pathway_cli::server::shutdown";

/// Starts the HTTP server and serves until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the listener cannot bind to the configured address
/// or the server encounters a fatal error during operation.
pub async fn serve(app: Router, server_config: ServerConfig) -> std::io::Result<()> {
    let server_addr = server_config.server_addr();

    let listener = tokio::net::TcpListener::bind(server_addr)
        .await
        .inspect_err(|error| {
            tracing::error!(
                target: TRACING_TARGET_STARTUP,
                addr = %server_addr,
                error = %error,
                "failed to bind to address"
            );
        })?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_addr,
        "server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "server is bound to all interfaces; ensure firewall rules are configured"
        );
    }

    let shutdown = shutdown_signal(server_config.shutdown_timeout());
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .inspect_err(|error| {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "server encountered an error"
        );
    })?;

    tracing::info!(target: TRACING_TARGET_SHUTDOWN, "server shut down gracefully");
    Ok(())
}
