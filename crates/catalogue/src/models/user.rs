//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use bookden_core::{UserId, Username};

/// A registered account (domain type).
///
/// The stored password hash is deliberately not part of this type; it only
/// surfaces through `UserRepository::get_password_hash` during login.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique, case-sensitive display name.
    pub username: Username,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
