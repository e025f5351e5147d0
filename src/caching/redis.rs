//! Redis cache client.
//!
//! Wraps the `redis` crate with JSON serialization so callers store typed
//! values. Like the database handle, construction is lazy: `Client::open`
//! only parses the URL, no connection is made until a command runs. The
//! readiness probe verifies reachability with a full set/get/delete round
//! trip rather than a bare PING, so a read-only or misbehaving cache also
//! shows up as not ready.

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::Settings;
use crate::core::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

impl RedisClient {
    /// # Errors
    ///
    /// Returns `AppError::CacheError` when the URL cannot be parsed. An
    /// unreachable server is not an error here.
    pub fn connect(settings: &Settings) -> AppResult<Self> {
        let client = Client::open(settings.cache_url.as_str())
            .map_err(|e| AppError::CacheError(format!("invalid cache URL: {e}")))?;

        Ok(Self { client })
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))
    }

    /// Write-read-delete round trip used by the readiness probe. The key
    /// carries a short TTL in case the delete never runs.
    pub async fn check_round_trip(&self) -> AppResult<()> {
        const KEY: &str = "health:check:probe";
        const VALUE: &str = "probe";

        let mut conn = self.connection().await?;

        conn.set_ex::<_, _, ()>(KEY, VALUE, 30)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))?;

        let read: Option<String> = conn
            .get(KEY)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))?;

        if read.as_deref() != Some(VALUE) {
            return Err(AppError::CacheError("read-back mismatch".to_string()));
        }

        conn.del::<_, ()>(KEY)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))?;

        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))?;

        match value {
            Some(json) => {
                let deserialized = serde_json::from_str(&json)
                    .map_err(|e| AppError::CacheError(format!("deserialization failed: {e}")))?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::CacheError(format!("serialization failed: {e}")))?;
        conn.set_ex(key, json, seconds)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))
    }

    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection().await?;
        conn.exists(key)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))
    }

    pub async fn del(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.del(key)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))
    }
}
