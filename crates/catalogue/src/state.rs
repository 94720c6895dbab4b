//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::CatalogueConfig;
use crate::services::books::{BooksClient, LookupError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogueConfig,
    pool: SqlitePool,
    books: BooksClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Catalogue configuration
    /// * `pool` - `SQLite` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the book lookup client cannot be built.
    pub fn new(config: CatalogueConfig, pool: SqlitePool) -> Result<Self, LookupError> {
        let books = BooksClient::new(&config.books_api_base_url)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                books,
            }),
        })
    }

    /// Get a reference to the catalogue configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogueConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the book metadata lookup client.
    #[must_use]
    pub fn books(&self) -> &BooksClient {
        &self.inner.books
    }
}
