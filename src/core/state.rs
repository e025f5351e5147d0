//! Application state shared across workers.
//!
//! Everything a handler needs is constructed once at boot and injected via
//! `web::Data<AppState>`. Settings are immutable for the process lifetime;
//! the store handles are cheap clones over pooled connections.

use std::sync::Arc;

use log::{info, warn};

use crate::caching::RedisClient;
use crate::config::Settings;
use crate::core::errors::AppResult;
use crate::db::Database;
use crate::repositories::UserRepository;
use crate::services::{HealthService, TokenService, UserService};

pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: Database,
    pub cache: RedisClient,
    pub health: HealthService,
    pub tokens: TokenService,
    pub users: UserService,
}

impl AppState {
    /// Wires repositories and services together. Performs no network I/O;
    /// dependency reachability is the readiness probe's concern.
    pub async fn build(settings: Settings) -> AppResult<Self> {
        let db = Database::connect(&settings).await?;
        let cache = RedisClient::connect(&settings)?;
        Ok(Self::with_stores(settings, db, cache))
    }

    pub fn with_stores(settings: Settings, db: Database, cache: RedisClient) -> Self {
        let settings = Arc::new(settings);

        let health = HealthService::new(db.clone(), cache.clone(), &settings);
        let tokens = TokenService::new(&settings, cache.clone());
        let repo = UserRepository::new(db.clone(), cache.clone());
        let users = UserService::new(repo, tokens.clone(), cache.clone(), settings.bcrypt_cost);

        Self {
            settings,
            db,
            cache,
            health,
            tokens,
            users,
        }
    }

    /// Best-effort boot checks: ping both stores and create indexes. A
    /// failure is logged, not fatal; the process must come up even while a
    /// dependency is down and recover once it returns.
    pub async fn warm_up(&self) {
        match self.db.ping().await {
            Ok(()) => {
                info!("✅ MongoDB reachable: {}", self.db.database_name());
                let repo = UserRepository::new(self.db.clone(), self.cache.clone());
                if let Err(e) = repo.ensure_indexes().await {
                    warn!("index creation deferred: {e}");
                }
            }
            Err(e) => warn!("MongoDB not reachable at boot: {e}"),
        }

        match self.cache.ping().await {
            Ok(()) => info!("✅ Redis reachable"),
            Err(e) => warn!("Redis not reachable at boot: {e}"),
        }
    }
}
