//! Finacle backend service.
//!
//! HTTP backend for the Finacle financial-management application. The
//! current surface is operational: health/readiness/liveness probes for
//! container orchestration, plus account registration, JWT authentication
//! and profile management backed by MongoDB and Redis.
//!
//! # Architecture
//!
//! ```text
//! routes ─▶ handlers ─▶ services ─▶ repositories ─▶ MongoDB + Redis
//! ```
//!
//! All state is wired once at boot into [`core::state::AppState`] and
//! injected into handlers through `web::Data`; configuration is an
//! immutable [`config::Settings`] value validated before the port binds.

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
