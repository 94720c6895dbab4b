//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace or control characters.
    #[error("username cannot contain whitespace or control characters")]
    InvalidCharacters,
}

/// A display name identifying an account.
///
/// Usernames are case-sensitive: `Alice` and `alice` are two distinct
/// accounts. Validation is structural only; uniqueness is enforced by the
/// credential store.
///
/// ## Constraints
///
/// - Length: 1-150 characters
/// - No whitespace or control characters
///
/// ## Examples
///
/// ```
/// use bookden_core::Username;
///
/// // Valid usernames
/// assert!(Username::parse("alice").is_ok());
/// assert!(Username::parse("book_lover99").is_ok());
///
/// // Invalid usernames
/// assert!(Username::parse("").is_err());        // empty
/// assert!(Username::parse("two words").is_err()); // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 150;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 150 characters
    /// - Contains whitespace or control characters
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(UsernameError::InvalidCharacters);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(Username::parse("alice").is_ok());
        assert!(Username::parse("book_lover99").is_ok());
        assert!(Username::parse("Ada.Lovelace").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(Username::parse(""), Err(UsernameError::Empty)));
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(Username::MAX_LENGTH + 1);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn accepts_max_length() {
        let max = "a".repeat(Username::MAX_LENGTH);
        assert!(Username::parse(&max).is_ok());
    }

    #[test]
    fn rejects_whitespace_and_control() {
        assert!(matches!(
            Username::parse("two words"),
            Err(UsernameError::InvalidCharacters)
        ));
        assert!(matches!(
            Username::parse("tab\there"),
            Err(UsernameError::InvalidCharacters)
        ));
    }

    #[test]
    fn is_case_sensitive() {
        let upper = Username::parse("Alice").expect("valid");
        let lower = Username::parse("alice").expect("valid");
        assert_ne!(upper, lower);
    }
}
