//! Application state container shared across Axum route handlers.
//!
//! Holds the database connection. It is cloned into every handler through Axum's
//! `State<T>` extractor; `DatabaseConnection` is itself a cheap handle to the pool.

use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
