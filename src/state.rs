use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;

/// Shared router state: the storage pool and the validated startup config.
/// Both are read-only after startup and cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
