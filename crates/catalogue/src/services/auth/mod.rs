//! Authentication service.
//!
//! Registration and login over the credential store. Passwords are stored as
//! salted Argon2id hashes and verified with the constant-time verifier;
//! plaintext never reaches the database.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use bookden_core::{UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::EmptyPassword` if the password is empty.
    /// Returns `AuthError::UsernameTaken` if the username is already registered.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        // Validate username
        let username = Username::parse(username)?;

        // Validate password
        validate_password(password)?;

        // Hash password
        let password_hash = hash_password(password)?;

        // Create user
        let user = self
            .users
            .create(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// An unknown username and a wrong password yield the same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        // A malformed username can never match a stored account.
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        // Get user with password hash
        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Verify password
        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        let user = self.users.get_by_id(user_id).await?;
        Ok(user)
    }
}

/// Validate password meets requirements.
///
/// Only emptiness is rejected; there is deliberately no length policy.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::EmptyPassword);
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("pw1").unwrap();
        assert!(verify_password("pw1", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn hashing_salts_each_password() {
        let first = hash_password("pw1").unwrap();
        let second = hash_password("pw1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn hash_is_not_plaintext() {
        let hash = hash_password("pw1").unwrap();
        assert!(!hash.contains("pw1"));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn register_then_login() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let registered = auth.register("alice", "pw1").await.unwrap();
        let logged_in = auth.login("alice", "pw1").await.unwrap();
        assert_eq!(logged_in.id, registered.id);
    }

    #[tokio::test]
    async fn short_passwords_are_accepted() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        assert!(auth.register("alice", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn empty_password_is_rejected() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        assert!(matches!(
            auth.register("alice", "").await,
            Err(AuthError::EmptyPassword)
        ));
    }

    #[tokio::test]
    async fn duplicate_registration_is_taken() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("alice", "pw1").await.unwrap();
        assert!(matches!(
            auth.register("alice", "pw2").await,
            Err(AuthError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("alice", "pw1").await.unwrap();

        let wrong_password = auth.login("alice", "wrong").await;
        let unknown_user = auth.login("mallory", "pw1").await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(AuthError::InvalidCredentials)));
    }
}
