//! Database handle used by the health probes
//!
//! Production code uses `MongoStore`, a thin wrapper over a single shared
//! `mongodb::Client`. Tests use `FakeStore` to control probe outcomes.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria};
use mongodb::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Collection the liveness probe writes into
pub const PROBE_COLLECTION: &str = "ping";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// Username and password carried by the connection string
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Operations the HTTP layer needs from the database
///
/// Shared across request handlers behind an `Arc`; implementations must be
/// safe for concurrent use.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Write one probe document. Every call inserts a new record.
    async fn write_probe(&self) -> Result<(), StoreError>;

    /// Round-trip to the primary without touching data
    async fn ping(&self) -> Result<(), StoreError>;

    fn credentials(&self) -> &Credentials;

    /// Release the underlying connections. Called once, after the HTTP
    /// server has stopped.
    async fn disconnect(&self);
}

/// MongoDB-backed store
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
    credentials: Credentials,
}

impl MongoStore {
    /// Parse the URI and build a client.
    ///
    /// The driver connects lazily, so an unreachable but well-formed URI
    /// still yields a store; its probes fail instead.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(uri).await?;

        let credentials = options
            .credential
            .as_ref()
            .map(|c| Credentials {
                username: c.username.clone(),
                password: c.password.clone(),
            })
            .unwrap_or_default();

        let client = Client::with_options(options)?;
        info!(database = %database, "MongoDB client created");

        Ok(Self {
            client,
            database: database.to_string(),
            credentials,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

#[async_trait]
impl HealthStore for MongoStore {
    async fn write_probe(&self) -> Result<(), StoreError> {
        let result = self
            .client
            .database(&self.database)
            .collection::<Document>(PROBE_COLLECTION)
            .insert_one(doc! { "ping": true })
            .await?;
        debug!(id = %result.inserted_id, "Probe document written");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
            .await?;
        Ok(())
    }

    fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    async fn disconnect(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client disconnected");
    }
}


#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
