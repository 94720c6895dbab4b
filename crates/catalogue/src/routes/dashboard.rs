//! Catalogue route handlers: list, add-by-ISBN, delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use bookden_core::BookId;

use crate::db::books::{BookRepository, DeleteOutcome};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::book::{Book, NewBook};
use crate::state::AppState;

// =============================================================================
// Form and Query Types
// =============================================================================

/// ISBN submission form data.
#[derive(Debug, Deserialize)]
pub struct IsbnForm {
    pub isbn: String,
}

/// Query parameters for notice display.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    /// Title of a book that was just added.
    pub added: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Book display data for the dashboard template.
pub struct BookView {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub page_count: i64,
    pub rating: String,
    pub thumbnail_url: String,
}

/// Format an average rating for display.
fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.as_i64(),
            isbn: book.isbn,
            title: book.title,
            author: book.author,
            page_count: book.page_count,
            rating: format_rating(book.average_rating),
            thumbnail_url: book.thumbnail_url,
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub books: Vec<BookView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Map a dashboard error code to its inline notice.
fn dashboard_error_message(code: &str) -> String {
    match code {
        "no_results" => "No results found for the provided ISBN.",
        "lookup_failed" => "Error fetching book data. Try again later.",
        "unauthorized" => "Unauthorized action.",
        _ => "Something went wrong. Try again.",
    }
    .to_string()
}

/// Build the success notice from query parameters.
fn dashboard_success_message(query: &DashboardQuery) -> Option<String> {
    if let Some(title) = &query.added {
        return Some(format!("Book \"{title}\" added successfully!"));
    }

    query.success.as_deref().map(|code| {
        match code {
            "deleted" => "Book deleted successfully.",
            _ => "Done.",
        }
        .to_string()
    })
}

// =============================================================================
// Routes
// =============================================================================

/// Display the dashboard: all books owned by the current account, in
/// insertion order.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<DashboardQuery>,
) -> Result<DashboardTemplate, AppError> {
    let books = BookRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(DashboardTemplate {
        username: user.username.into_inner(),
        books: books.into_iter().map(BookView::from).collect(),
        error: query.error.as_deref().map(dashboard_error_message),
        success: dashboard_success_message(&query),
    })
}

/// Handle ISBN form submission: look the book up and save it.
///
/// The submitted string is passed to the lookup client unvalidated; junk
/// input simply finds no volumes. Nothing is written unless the lookup
/// succeeds.
pub async fn add_book(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<IsbnForm>,
) -> Result<Response, AppError> {
    match state.books().lookup(&form.isbn).await {
        Ok(Some(metadata)) => {
            let record = NewBook::from_metadata(form.isbn, metadata);
            let book = BookRepository::new(state.pool())
                .insert(user.id, &record)
                .await?;

            tracing::info!(user = %user.username, title = %book.title, "book added");
            let location = format!("/dashboard?added={}", urlencoding::encode(&book.title));
            Ok(Redirect::to(&location).into_response())
        }
        Ok(None) => {
            tracing::debug!(isbn = %form.isbn, "lookup found no volumes");
            Ok(Redirect::to("/dashboard?error=no_results").into_response())
        }
        Err(e) => {
            tracing::warn!(isbn = %form.isbn, "book lookup failed: {e}");
            Ok(Redirect::to("/dashboard?error=lookup_failed").into_response())
        }
    }
}

/// Handle deletion of a saved book.
///
/// A missing record and a record owned by someone else produce the same
/// generic notice, so ids cannot be probed across accounts.
pub async fn delete_book(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let outcome = BookRepository::new(state.pool())
        .delete(BookId::new(id), user.id)
        .await?;

    match outcome {
        DeleteOutcome::Deleted => Ok(Redirect::to("/dashboard?success=deleted").into_response()),
        DeleteOutcome::NotFound | DeleteOutcome::NotOwner => {
            tracing::warn!(user = %user.username, book_id = id, "denied book deletion");
            Ok(Redirect::to("/dashboard?error=unauthorized").into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_is_formatted_to_one_decimal() {
        assert_eq!(format_rating(4.0), "4.0");
        assert_eq!(format_rating(3.456), "3.5");
        assert_eq!(format_rating(0.0), "0.0");
    }

    #[test]
    fn added_title_beats_success_code() {
        let query = DashboardQuery {
            error: None,
            success: Some("deleted".to_string()),
            added: Some("The Odyssey".to_string()),
        };
        assert_eq!(
            dashboard_success_message(&query).as_deref(),
            Some("Book \"The Odyssey\" added successfully!")
        );
    }

    #[test]
    fn delete_notice_is_generic_for_unknown_codes() {
        assert_eq!(
            dashboard_error_message("unauthorized"),
            "Unauthorized action."
        );
        assert_eq!(
            dashboard_error_message("anything-else"),
            "Something went wrong. Try again."
        );
    }
}
