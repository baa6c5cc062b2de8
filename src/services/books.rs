//! Book catalog service

use std::sync::Arc;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{Book, BookDraft},
    repository::BookStore,
};

/// Validation façade over a [`BookStore`]. Holds no state between calls.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(self.store.get_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        Ok(self.store.get_by_id(id).await?)
    }

    /// Validate and persist a new book
    pub async fn create(&self, draft: &BookDraft) -> AppResult<Book> {
        draft.validate()?;
        let book = self.store.create(draft).await?;
        tracing::info!("Created book id={} title={:?}", book.id, book.title);
        Ok(book)
    }

    /// Validate and overwrite an existing book
    pub async fn update(&self, id: i64, draft: &BookDraft) -> AppResult<Book> {
        draft.validate()?;
        let book = self.store.update(id, draft).await?;
        tracing::info!("Updated book id={}", id);
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.store.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}
