//! User repository for database operations.
//!
//! Rows are read into explicit row structs and mapped to domain types; no
//! runtime reflection.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use bookden_core::{UserId, Username};

use super::RepositoryError;
use crate::models::user::User;

/// Database row for the `users` table (without the password hash).
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            username,
            created_at: self.created_at,
        })
    }
}

/// Database row for a credential lookup (user plus stored hash).
#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, created_at FROM users WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their username (exact, case-sensitive match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, created_at FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user with a username and password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, password_hash)
             VALUES (?, ?)
             RETURNING id, username, created_at",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Get a user together with their stored password hash, by username.
    ///
    /// Returns `None` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let username = Username::parse(&r.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        let user = User {
            id: UserId::new(r.id),
            username,
            created_at: r.created_at,
        };

        Ok(Some((user, r.password_hash)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn name(s: &str) -> Username {
        Username::parse(s).unwrap()
    }

    #[tokio::test]
    async fn create_and_fetch_round_trip() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let created = repo.create(&name("alice"), "hash-a").await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create(&name("alice"), "hash-a").await.unwrap();
        let second = repo.create(&name("alice"), "hash-b").await;

        assert!(matches!(second, Err(RepositoryError::Conflict(_))));

        // Exactly one account with that username exists afterward.
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = 'alice'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create(&name("Alice"), "hash-a").await.unwrap();
        repo.create(&name("alice"), "hash-b").await.unwrap();

        let upper = repo.get_by_username(&name("Alice")).await.unwrap().unwrap();
        let lower = repo.get_by_username(&name("alice")).await.unwrap().unwrap();
        assert_ne!(upper.id, lower.id);
    }

    #[tokio::test]
    async fn password_hash_lookup() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create(&name("alice"), "stored-hash").await.unwrap();

        let (user, hash) = repo
            .get_password_hash(&name("alice"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(hash, "stored-hash");

        assert!(
            repo.get_password_hash(&name("nobody"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn get_by_id_missing_is_none() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        assert!(repo.get_by_id(UserId::new(999)).await.unwrap().is_none());
    }
}
