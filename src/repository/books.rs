//! SQLite-backed book store

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{BookStore, StoreError, StoreResult};
use crate::models::{Book, BookDraft};

#[derive(Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn get_all(&self) -> StoreResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT id, title, author FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>("SELECT id, title, author FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, draft: &BookDraft) -> StoreResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author)
            VALUES (?, ?)
            RETURNING id, title, author
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.author)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, draft: &BookDraft) -> StoreResult<Book> {
        let result = sqlx::query("UPDATE books SET title = ?, author = ? WHERE id = ?")
            .bind(&draft.title)
            .bind(&draft.author)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(Book::from_draft(id, draft.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
