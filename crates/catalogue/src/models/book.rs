//! Book domain types.

use chrono::{DateTime, Utc};

use bookden_core::{BookId, UserId};

use crate::services::books::BookMetadata;

/// A saved catalogue entry (domain type).
///
/// Owned by exactly one account; never updated in place.
#[derive(Debug, Clone)]
pub struct Book {
    /// Unique book record ID.
    pub id: BookId,
    /// Owning account.
    pub user_id: UserId,
    /// ISBN exactly as submitted (not format-validated).
    pub isbn: String,
    /// Book title ("N/A" when the lookup had none).
    pub title: String,
    /// Comma-joined contributing authors ("Unknown" when absent).
    pub author: String,
    /// Page count (0 when unknown).
    pub page_count: i64,
    /// Average rating (0 when unknown).
    pub average_rating: f64,
    /// Cover thumbnail URL (empty when absent).
    pub thumbnail_url: String,
    /// When the record was saved.
    pub created_at: DateTime<Utc>,
}

/// A catalogue entry about to be persisted.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub page_count: i64,
    pub average_rating: f64,
    pub thumbnail_url: String,
}

impl NewBook {
    /// Build a record from a lookup result, keeping the ISBN as submitted.
    #[must_use]
    pub fn from_metadata(isbn: String, metadata: BookMetadata) -> Self {
        Self {
            isbn,
            title: metadata.title,
            author: metadata.author,
            page_count: metadata.page_count,
            average_rating: metadata.average_rating,
            thumbnail_url: metadata.thumbnail_url,
        }
    }
}
