use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Connection pool to the relational store, created once at startup.
/// Individual queries borrow and return connections per call.
#[derive(Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
            .connect(&config.url())
            .await?;

        info!(
            "Database pool connected: {}:{}/{} (max {} connections)",
            config.host,
            config.port,
            config.name,
            config.max_connections()
        );

        Ok(Self { pool })
    }

    /// Wrap an already-built pool, e.g. one created lazily in tests.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}
