//! Graceful shutdown
//!
//! On SIGINT or SIGTERM the server stops accepting connections and in-flight
//! requests get `server.shutdown_timeout_secs` to finish. Whatever is still
//! open after that is dropped.

use std::time::Duration;

use tokio::{signal, sync::oneshot};
use tracing::{info, warn};

/// How the server stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drain {
    /// Every connection closed on its own
    Completed,
    /// The drain timeout elapsed with connections still open
    TimedOut,
}

/// Wait for SIGINT or SIGTERM, then notify `draining`
pub async fn shutdown_signal(draining: oneshot::Sender<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // The receiver is gone only if the server already stopped
    let _ = draining.send(());
}

/// Drive `server` to completion, allowing at most `timeout` once `draining` fires
///
/// # Errors
///
/// Returns the server's own I/O error.
pub async fn run_until_drained<F>(
    server: F,
    draining: oneshot::Receiver<()>,
    timeout: Duration,
) -> std::io::Result<Drain>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result.map(|()| Drain::Completed),
        Ok(()) = draining => {
            info!("⏳ Waiting up to {:?} for connections to close...", timeout);
            if let Ok(result) = tokio::time::timeout(timeout, &mut server).await {
                result.map(|()| Drain::Completed)
            } else {
                warn!(?timeout, "Shutdown timeout elapsed, dropping open connections");
                Ok(Drain::TimedOut)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn server_that_stops_by_itself_completes() {
        let (_tx, rx) = oneshot::channel();

        let drain = run_until_drained(async { Ok(()) }, rx, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(drain, Drain::Completed);
    }

    #[tokio::test]
    async fn drain_within_timeout_completes() {
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();
        let server = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(())
        };

        let drain = run_until_drained(server, rx, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(drain, Drain::Completed);
    }

    #[tokio::test]
    async fn stuck_connections_are_dropped_after_timeout() {
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();
        let server = std::future::pending::<std::io::Result<()>>();

        let drain = tokio::time::timeout(
            Duration::from_secs(5),
            run_until_drained(server, rx, Duration::from_millis(50)),
        )
        .await
        .expect("drain timeout was not enforced")
        .unwrap();

        assert_eq!(drain, Drain::TimedOut);
    }

    #[tokio::test]
    async fn server_error_is_returned() {
        let (_tx, rx) = oneshot::channel();
        let server = async { Err(std::io::Error::other("accept failed")) };

        let result = run_until_drained(server, rx, Duration::from_secs(1)).await;

        assert!(result.is_err());
    }
}
