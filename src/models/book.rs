//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Persisted book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Identifier assigned by the store on creation
    pub id: i64,
    pub title: String,
    pub author: String,
}

/// Client-supplied book payload, used for both create and update.
/// An `id` key in the payload is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookDraft {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub author: String,
}

impl Book {
    pub fn from_draft(id: i64, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
        }
    }
}
