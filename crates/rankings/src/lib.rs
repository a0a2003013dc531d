pub mod domains;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use domains::DomainRegistry;
pub use error::{RankingError, Result};
pub use repository::{MemoryRankingStore, PgRankingStore, RankingStore};
pub use services::RankingEngine;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_max_connections(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn with_max_connections(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// A ranking engine persisting through this database.
    pub fn engine(&self) -> RankingEngine {
        RankingEngine::new(Arc::new(PgRankingStore::new(self.pool.clone())))
    }
}
