//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::CrmConfig;
use crate::db::{CrmStore, PgStore};
use crate::graphql::{CrmSchema, build_schema};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the database pool,
/// and the executable GraphQL schema.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CrmConfig,
    pool: PgPool,
    schema: CrmSchema,
}

impl AppState {
    /// Create a new application state over a `PostgreSQL`-backed store.
    #[must_use]
    pub fn new(config: CrmConfig, pool: PgPool) -> Self {
        let store: Arc<dyn CrmStore> = Arc::new(PgStore::new(pool.clone()));
        let schema = build_schema(store);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                schema,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &CrmConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the GraphQL schema.
    #[must_use]
    pub fn schema(&self) -> &CrmSchema {
        &self.inner.schema
    }
}
