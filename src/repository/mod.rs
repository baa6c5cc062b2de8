//! Repository layer for database operations

pub mod books;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use thiserror::Error;

use crate::{
    config::DatabaseConfig,
    models::{Book, BookDraft},
};

pub use books::SqliteBookStore;

/// Outcome of a failed storage operation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no book with id {0}")]
    NotFound(i64),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Row-level book storage. Any backend offering these five operations can
/// sit under the service layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, in insertion order
    async fn get_all(&self) -> StoreResult<Vec<Book>>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Book>;

    /// Insert a book and return it with its assigned id
    async fn create(&self, draft: &BookDraft) -> StoreResult<Book>;

    /// Overwrite title and author of an existing book, keeping its id
    async fn update(&self, id: i64, draft: &BookDraft) -> StoreResult<Book>;

    async fn delete(&self, id: i64) -> StoreResult<()>;
}

/// Open a connection pool for the configured database, creating the
/// SQLite file when it does not exist yet.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    // Every connection to `:memory:` gets its own database, so keep exactly one alive
    let pool = if config.url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?
    };

    Ok(pool)
}

/// Create the books table if absent
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
