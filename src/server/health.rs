//! Health check and debug endpoints
//!
//! - `/_/health/liveness` - Liveness: can we write to MongoDB?
//! - `/_/health/readiness` - Readiness: can we reach the MongoDB primary?
//! - `/` - Debug: echoes the connection credentials (opt-in only)

use crate::server::shutdown::ShutdownSignal;
use crate::store::{Credentials, HealthStore, StoreError};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const LIVENESS_PATH: &str = "/_/health/liveness";
pub const READINESS_PATH: &str = "/_/health/readiness";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

/// Error detail reported for a failing dependency
#[derive(Debug, Serialize, PartialEq)]
pub struct DependencyError {
    pub error: String,
}

/// JSON body returned by both probes
#[derive(Debug, Serialize, PartialEq)]
pub struct HealthResponse {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mongodb: Option<DependencyError>,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: Status::Up,
            mongodb: None,
        }
    }

    pub fn down(error: &StoreError) -> Self {
        Self {
            status: Status::Down,
            mongodb: Some(DependencyError {
                error: error.to_string(),
            }),
        }
    }
}

/// Shared state for the route handlers
#[derive(Clone)]
pub struct ServerState {
    store: Arc<dyn HealthStore>,
}

impl ServerState {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }
}

/// Map a probe outcome to its HTTP response
fn probe_response(
    probe: &'static str,
    result: Result<(), StoreError>,
) -> (StatusCode, Json<HealthResponse>) {
    match result {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::up())),
        Err(e) => {
            warn!(probe = probe, error = %e, "Health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::down(&e)),
            )
        }
    }
}

/// Liveness probe handler
///
/// Inserts a document on every call, so a 200 means the database accepts
/// writes.
async fn liveness(State(state): State<ServerState>) -> (StatusCode, Json<HealthResponse>) {
    probe_response("liveness", state.store.write_probe().await)
}

/// Readiness probe handler
async fn readiness(State(state): State<ServerState>) -> (StatusCode, Json<HealthResponse>) {
    probe_response("readiness", state.store.ping().await)
}

async fn credentials(State(state): State<ServerState>) -> Json<Credentials> {
    Json(state.store.credentials().clone())
}

/// Build the router for the probe endpoints
///
/// `expose_credentials` adds the `/` debug route, which returns the database
/// username and password in plain text.
pub fn build_router(store: Arc<dyn HealthStore>, expose_credentials: bool) -> Router {
    let mut router = Router::new()
        .route(LIVENESS_PATH, get(liveness))
        .route(READINESS_PATH, get(readiness));

    if expose_credentials {
        warn!("Debug route / is enabled and exposes database credentials");
        router = router.route("/", get(credentials));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(ServerState::new(store))
}

/// Serve the health endpoints on an already bound listener
///
/// Returns once `shutdown` fires and every in-flight request has completed.
pub async fn run_health_server(
    listener: TcpListener,
    store: Arc<dyn HealthStore>,
    expose_credentials: bool,
    mut shutdown: ShutdownSignal,
) -> Result<(), std::io::Error> {
    let app = build_router(store, expose_credentials);

    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "Health server listening (HTTP)");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}
