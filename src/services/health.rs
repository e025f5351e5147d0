//! Probe logic behind the health, readiness and liveness endpoints.
//!
//! The orchestrator decides restarts from health/liveness and traffic
//! admission from readiness, so the contract here is strict: probes never
//! block past their bound, never mutate shared state, and a readiness
//! failure must not leak into the other two probes. Every dependency ping
//! runs under `tokio::time::timeout`; a ping that does not finish within
//! the configured bound is reported as unhealthy, not awaited further.
//! When the probing client disconnects mid-request the handler future is
//! dropped, which abandons any in-flight ping with it.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::warn;

use crate::caching::RedisClient;
use crate::config::{Environment, Settings};
use crate::core::errors::AppResult;
use crate::db::Database;
use crate::domain::dto::{
    DependencyCheck, HealthResponse, LivenessResponse, ReadinessChecks, ReadinessResponse,
};

#[derive(Clone)]
pub struct HealthService {
    db: Database,
    cache: RedisClient,
    environment: Environment,
    probe_timeout: Duration,
    started_at: Instant,
}

impl HealthService {
    pub fn new(db: Database, cache: RedisClient, settings: &Settings) -> Self {
        Self {
            db,
            cache,
            environment: settings.environment,
            probe_timeout: settings.probe_timeout,
            started_at: Instant::now(),
        }
    }

    /// Process-level health: no dependency checks, succeeds whenever the
    /// worker can run this handler at all.
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy".to_string(),
            timestamp: now_epoch(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: self.environment.as_str().to_string(),
        }
    }

    /// Event-loop responsiveness plus uptime.
    pub fn liveness(&self) -> LivenessResponse {
        LivenessResponse {
            status: "alive".to_string(),
            timestamp: now_epoch(),
            uptime: self.started_at.elapsed().as_secs(),
        }
    }

    /// Pings both declared dependencies with bounded checks and reports
    /// which of them failed. Dependency errors are captured into the
    /// response, never propagated.
    pub async fn readiness(&self) -> ReadinessResponse {
        let database = self.run_check("database", self.db.ping()).await;
        let cache = self.run_check("cache", self.cache.check_round_trip()).await;

        let ready = database.is_healthy() && cache.is_healthy();

        ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: now_epoch(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: ReadinessChecks { database, cache },
        }
    }

    async fn run_check<F>(&self, name: &str, check: F) -> DependencyCheck
    where
        F: Future<Output = AppResult<()>>,
    {
        let started = Instant::now();

        match tokio::time::timeout(self.probe_timeout, check).await {
            Ok(Ok(())) => DependencyCheck::healthy(started.elapsed().as_millis() as u64),
            Ok(Err(e)) => {
                warn!("readiness check failed for {name}: {e}");
                DependencyCheck::unhealthy(e.to_string())
            }
            Err(_) => {
                warn!(
                    "readiness check for {name} timed out after {:?}",
                    self.probe_timeout
                );
                DependencyCheck::unhealthy(format!(
                    "check timed out after {}ms",
                    self.probe_timeout.as_millis()
                ))
            }
        }
    }
}

fn now_epoch() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}
