//! MongoDB connection handle.
//!
//! The handle is constructed lazily from [`Settings`]: creating it never
//! performs network I/O, so the process can boot while the database is down.
//! Reachability is the readiness probe's concern, checked via [`Database::ping`].

use log::info;
use mongodb::{Client, options::ClientOptions};

use crate::config::Settings;
use crate::core::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// Builds a client from the configured connection string.
    ///
    /// The driver's server-selection timeout is clamped to the probe timeout
    /// so a readiness check against an unreachable server fails within its
    /// bound instead of waiting out the driver default.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DatabaseError` when the connection string cannot
    /// be parsed. An unreachable server is not an error here.
    pub async fn connect(settings: &Settings) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&settings.database_url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("invalid connection string: {e}")))?;

        client_options.app_name = Some("finacle_backend".to_string());
        client_options.server_selection_timeout = Some(settings.probe_timeout);

        let client = Client::with_options(client_options)
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        info!("📡 MongoDB client configured for database {}", settings.database_name);

        Ok(Self {
            client,
            database_name: settings.database_name.clone(),
        })
    }

    /// Round trip to the server with a `ping` admin command.
    pub async fn ping(&self) -> AppResult<()> {
        self.client
            .database(&self.database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    pub fn database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> mongodb::Collection<T> {
        self.database().collection(name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
