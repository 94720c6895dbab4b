//! Book repository for database operations.
//!
//! Every read and write here is scoped to an owning account; a book is only
//! ever visible to, or deletable by, its owner.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use bookden_core::{BookId, UserId};

use super::RepositoryError;
use crate::models::book::{Book, NewBook};

/// Outcome of an ownership-checked delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record existed, belonged to the requester, and was removed.
    Deleted,
    /// No record with that id exists.
    NotFound,
    /// The record exists but belongs to a different account.
    NotOwner,
}

/// Database row for the `books` table.
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i64,
    user_id: i64,
    isbn: String,
    title: String,
    author: String,
    page_count: i64,
    average_rating: f64,
    thumbnail_url: String,
    created_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId::new(row.id),
            user_id: UserId::new(row.user_id),
            isbn: row.isbn,
            title: row.title,
            author: row.author,
            page_count: row.page_count,
            average_rating: row.average_rating,
            thumbnail_url: row.thumbnail_url,
            created_at: row.created_at,
        }
    }
}

const BOOK_COLUMNS: &str =
    "id, user_id, isbn, title, author, page_count, average_rating, thumbnail_url, created_at";

/// Repository for book database operations.
pub struct BookRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookRepository<'a> {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new book owned by the given account.
    ///
    /// Duplicate ISBNs for the same account are allowed; each submission
    /// creates an independent record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign-key violation for a nonexistent owner).
    pub async fn insert(&self, user_id: UserId, book: &NewBook) -> Result<Book, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "INSERT INTO books (user_id, isbn, title, author, page_count, average_rating, thumbnail_url)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {BOOK_COLUMNS}",
        ))
        .bind(user_id.as_i64())
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.page_count)
        .bind(book.average_rating)
        .bind(&book.thumbnail_url)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List all books owned by the given account, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user_id = ? ORDER BY id ASC",
        ))
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Get a book by its ID, regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?",
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    /// Delete a book after resolving it and checking ownership.
    ///
    /// The record is first resolved; a missing record reports
    /// [`DeleteOutcome::NotFound`], a record owned by a different account
    /// reports [`DeleteOutcome::NotOwner`] and nothing is removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn delete(
        &self,
        id: BookId,
        requesting_user: UserId,
    ) -> Result<DeleteOutcome, RepositoryError> {
        let owner: Option<(i64,)> = sqlx::query_as("SELECT user_id FROM books WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(self.pool)
            .await?;

        match owner {
            None => Ok(DeleteOutcome::NotFound),
            Some((owner_id,)) if owner_id != requesting_user.as_i64() => {
                Ok(DeleteOutcome::NotOwner)
            }
            Some(_) => {
                sqlx::query("DELETE FROM books WHERE id = ?")
                    .bind(id.as_i64())
                    .execute(self.pool)
                    .await?;
                Ok(DeleteOutcome::Deleted)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::db::users::UserRepository;
    use bookden_core::Username;

    async fn make_user(pool: &SqlitePool, username: &str) -> UserId {
        UserRepository::new(pool)
            .create(&Username::parse(username).unwrap(), "hash")
            .await
            .unwrap()
            .id
    }

    fn sample(isbn: &str, title: &str) -> NewBook {
        NewBook {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: "Homer".to_string(),
            page_count: 541,
            average_rating: 4.0,
            thumbnail_url: String::new(),
        }
    }

    #[tokio::test]
    async fn insert_and_list_round_trip() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice").await;
        let repo = BookRepository::new(&pool);

        let created = repo
            .insert(alice, &sample("9780140449136", "The Odyssey"))
            .await
            .unwrap();
        assert_eq!(created.user_id, alice);
        assert_eq!(created.title, "The Odyssey");
        assert_eq!(created.page_count, 541);

        let books = repo.list_for_user(alice).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, created.id);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice").await;
        let repo = BookRepository::new(&pool);

        for title in ["A", "B", "C"] {
            repo.insert(alice, &sample("111", title)).await.unwrap();
        }

        let titles: Vec<String> = repo
            .list_for_user(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn duplicate_isbn_creates_second_record() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice").await;
        let repo = BookRepository::new(&pool);

        let first = repo
            .insert(alice, &sample("9780140449136", "The Odyssey"))
            .await
            .unwrap();
        let second = repo
            .insert(alice, &sample("9780140449136", "The Odyssey"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(repo.list_for_user(alice).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_owner() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice").await;
        let bob = make_user(&pool, "bob").await;
        let repo = BookRepository::new(&pool);

        repo.insert(alice, &sample("111", "Alice's Book"))
            .await
            .unwrap();

        assert_eq!(repo.list_for_user(alice).await.unwrap().len(), 1);
        assert!(repo.list_for_user(bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_requires_ownership() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice").await;
        let bob = make_user(&pool, "bob").await;
        let repo = BookRepository::new(&pool);

        let book = repo
            .insert(alice, &sample("111", "Alice's Book"))
            .await
            .unwrap();

        // Bob cannot delete Alice's book; nothing is mutated.
        let outcome = repo.delete(book.id, bob).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotOwner);
        assert!(repo.get(book.id).await.unwrap().is_some());

        // Alice can.
        let outcome = repo.delete(book.id, alice).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(repo.get(book.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_record_is_not_found() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice").await;
        let repo = BookRepository::new(&pool);

        let outcome = repo.delete(BookId::new(999), alice).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn owner_must_be_an_extant_account() {
        let pool = test_pool().await;
        let repo = BookRepository::new(&pool);

        let result = repo
            .insert(UserId::new(999), &sample("111", "Orphan"))
            .await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }
}
