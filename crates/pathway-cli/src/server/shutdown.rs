//! Graceful shutdown signal handling.

use std::time::Duration;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;

use super::TRACING_TARGET_SHUTDOWN;

/// Waits for a shutdown signal (SIGTERM or SIGINT/Ctrl+C).
///
/// Once a signal arrives, a hard deadline is armed: if in-flight requests
/// have not drained within `shutdown_timeout`, the process exits with a
/// failure code instead of hanging forever.
pub async fn shutdown_signal(shutdown_timeout: Duration) {
    let interrupt = async {
        if let Err(error) = ctrl_c().await {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %error,
                "failed to install the interrupt signal handler"
            );
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_SHUTDOWN,
                    error = %error,
                    "failed to install the terminate signal handler"
                );
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {
            tracing::info!(target: TRACING_TARGET_SHUTDOWN, "interrupt signal received");
        }
        () = terminate => {
            tracing::info!(target: TRACING_TARGET_SHUTDOWN, "terminate signal received");
        }
    }

    tokio::spawn(async move {
        tokio::time::sleep(shutdown_timeout).await;
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            timeout = ?shutdown_timeout,
            "graceful shutdown timed out, terminating"
        );
        std::process::exit(1);
    });
}
