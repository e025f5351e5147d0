//! Probe response bodies.
//!
//! Consumed by the container health check and the orchestrator, so the
//! field names are part of the operational contract: a readiness failure
//! must identify the failing dependency by name under `checks`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: f64,
    pub version: String,
    pub environment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
    pub timestamp: f64,
    /// Seconds since process start.
    pub uptime: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Healthy,
    Unhealthy,
}

/// Outcome of a single bounded dependency ping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyCheck {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DependencyCheck {
    pub fn healthy(response_time_ms: u64) -> Self {
        Self {
            status: CheckStatus::Healthy,
            response_time_ms: Some(response_time_ms),
            error: None,
        }
    }

    pub fn unhealthy(error: String) -> Self {
        Self {
            status: CheckStatus::Unhealthy,
            response_time_ms: None,
            error: Some(error),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub database: DependencyCheck,
    pub cache: DependencyCheck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// `ready` or `not_ready`.
    pub status: String,
    pub timestamp: f64,
    pub version: String,
    pub checks: ReadinessChecks,
}

impl ReadinessResponse {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
