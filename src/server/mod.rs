//! HTTP server for the health endpoints
//!
//! Provides Kubernetes health probes backed by MongoDB:
//! - `/_/health/liveness` - Liveness probe (database accepts writes)
//! - `/_/health/readiness` - Readiness probe (database primary reachable)
//!
//! Also drives the service lifecycle and graceful shutdown on SIGTERM/SIGINT.

mod health;
pub mod lifecycle;
pub mod shutdown;

pub use health::{
    build_router, run_health_server, HealthResponse, Status, LIVENESS_PATH, READINESS_PATH,
};
pub use lifecycle::{run, serve_until_shutdown, LifecycleError, LifecycleState};
pub use shutdown::{shutdown_channel, wait_for_signal, ShutdownController, ShutdownSignal};

#[cfg(test)]
#[path = "health_test.rs"]
mod health_tests;

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_tests;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;
