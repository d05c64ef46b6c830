//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::directory::{DirectoryClient, DirectoryError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the directory client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    directory: DirectoryClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the directory client configuration is invalid.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, DirectoryError> {
        let directory = DirectoryClient::new(&config.directory)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                directory,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the user directory client.
    #[must_use]
    pub fn directory(&self) -> &DirectoryClient {
        &self.inner.directory
    }
}
