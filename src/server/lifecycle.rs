//! Service lifecycle: Starting -> Running -> ShuttingDown -> Stopped
//!
//! The HTTP server runs on a background task while the caller's future waits
//! for a termination signal. Shutdown then drains the server and releases the
//! database handle, both within one fixed deadline.

use crate::config::Config;
use crate::server::health::run_health_server;
use crate::server::shutdown::shutdown_channel;
use crate::store::HealthStore;
use std::fmt;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::time::{timeout_at, Instant};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Running,
    ShuttingDown,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::ShuttingDown => "shutting_down",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not start app on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server stopped unexpectedly: {0}")]
    Serve(#[source] io::Error),

    #[error("cannot wait for termination signal: {0}")]
    Signal(#[source] io::Error),

    #[error("server shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("server shutdown: {0}")]
    ShutdownFailed(String),

    #[error("MongoDB disconnection did not complete within {0:?}")]
    DisconnectTimeout(Duration),
}

fn enter(state: LifecycleState) {
    info!(state = %state, "Lifecycle state changed");
}

/// Bind the configured address and serve until `shutdown` resolves
///
/// Returns `Ok` only when the server drained and the store disconnected
/// within `config.shutdown_timeout`.
pub async fn run<F>(
    config: &Config,
    store: Arc<dyn HealthStore>,
    shutdown: F,
) -> Result<(), LifecycleError>
where
    F: Future<Output = io::Result<&'static str>>,
{
    enter(LifecycleState::Starting);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .map_err(|source| LifecycleError::Bind {
            addr: config.listen_addr,
            source,
        })?;

    serve_until_shutdown(listener, config, store, shutdown).await
}

/// Same as [`run`] but on a listener the caller already bound
pub async fn serve_until_shutdown<F>(
    listener: TcpListener,
    config: &Config,
    store: Arc<dyn HealthStore>,
    shutdown: F,
) -> Result<(), LifecycleError>
where
    F: Future<Output = io::Result<&'static str>>,
{
    let addr = listener.local_addr().map_err(LifecycleError::Serve)?;
    let (controller, signal) = shutdown_channel();

    let mut server = tokio::spawn(run_health_server(
        listener,
        Arc::clone(&store),
        config.expose_credentials,
        signal,
    ));

    enter(LifecycleState::Running);
    info!(addr = %addr, "App is running");

    tokio::select! {
        result = &mut server => {
            let err = match result {
                Ok(Ok(())) => io::Error::other("server exited before shutdown was requested"),
                Ok(Err(e)) => e,
                Err(e) => io::Error::other(e),
            };
            return Err(LifecycleError::Serve(err));
        }
        received = shutdown => {
            if let Err(e) = received {
                server.abort();
                return Err(LifecycleError::Signal(e));
            }
        }
    }

    enter(LifecycleState::ShuttingDown);
    info!("Exiting server gracefully");

    let budget = config.shutdown_timeout;
    let deadline = Instant::now() + budget;
    controller.shutdown();

    match timeout_at(deadline, &mut server).await {
        Ok(Ok(Ok(()))) => info!("HTTP server stopped"),
        Ok(Ok(Err(e))) => return Err(LifecycleError::ShutdownFailed(e.to_string())),
        Ok(Err(e)) => return Err(LifecycleError::ShutdownFailed(e.to_string())),
        Err(_) => {
            server.abort();
            return Err(LifecycleError::ShutdownTimeout(budget));
        }
    }

    // The router, and with it every handler's store reference, is gone by now.
    timeout_at(deadline, store.disconnect())
        .await
        .map_err(|_| LifecycleError::DisconnectTimeout(budget))?;

    enter(LifecycleState::Stopped);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(LifecycleState::Starting.to_string(), "starting");
        assert_eq!(LifecycleState::ShuttingDown.to_string(), "shutting_down");
    }

    #[test]
    fn test_timeout_errors_name_the_budget() {
        let err = LifecycleError::ShutdownTimeout(Duration::from_secs(5));
        assert_eq!(
            err.to_string(),
            "server shutdown did not complete within 5s"
        );
    }
}
