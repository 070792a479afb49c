//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::error::RepoError;
use blog_core::ports::PostRepository;
use blog_infra::InMemoryPostRepository;

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use blog_infra::database::{self, DatabaseConfig, PostgresPostRepository};
#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};

/// Which backend holds the posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Postgres,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Memory => "memory",
            StoreKind::Postgres => "postgres",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub store: StoreKind,
}

impl AppState {
    /// Build the application state for the configured backend.
    pub async fn new(config: &AppConfig) -> Result<Self, RepoError> {
        let state = match &config.database {
            #[cfg(feature = "postgres")]
            Some(db_config) => Self::postgres(db_config, config.run_migrations).await?,
            #[cfg(not(feature = "postgres"))]
            Some(_) => {
                tracing::warn!(
                    "DATABASE_URL set but built without postgres feature - using in-memory store"
                );
                Self::in_memory()
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        tracing::info!(store = state.store.as_str(), "Application state initialized");
        Ok(state)
    }

    pub fn with_store(posts: Arc<dyn PostRepository>, store: StoreKind) -> Self {
        Self { posts, store }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryPostRepository::new()), StoreKind::Memory)
    }

    /// State backed by PostgreSQL. A database that cannot be reached is an error.
    #[cfg(feature = "postgres")]
    pub async fn postgres(config: &DatabaseConfig, run_migrations: bool) -> Result<Self, RepoError> {
        let conn = database::connect(config)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        if run_migrations {
            Migrator::up(&conn, None)
                .await
                .map_err(|e| RepoError::Query(format!("migration failed: {}", e)))?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self::with_store(
            Arc::new(PostgresPostRepository::new(conn)),
            StoreKind::Postgres,
        ))
    }
}
