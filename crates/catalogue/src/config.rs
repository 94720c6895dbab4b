//! Catalogue configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOGUE_DATABASE_URL` - `SQLite` connection string (e.g., `sqlite://bookden.db?mode=rwc`)
//! - `CATALOGUE_SESSION_SECRET` - Session secret (min 32 chars, never compiled in)
//!
//! ## Optional
//! - `CATALOGUE_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOGUE_PORT` - Listen port (default: 3000)
//! - `CATALOGUE_BASE_URL` - Public URL (default: `http://localhost:3000`; https enables secure cookies)
//! - `BOOKS_API_BASE_URL` - Book metadata API (default: `https://www.googleapis.com/books/v1`)

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Catalogue application configuration.
#[derive(Debug, Clone)]
pub struct CatalogueConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the catalogue
    pub base_url: String,
    /// Session secret (environment-provided, validated at startup)
    pub session_secret: SecretString,
    /// Base URL of the book metadata lookup service
    pub books_api_base_url: String,
}

impl CatalogueConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (length, placeholder detection).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CATALOGUE_DATABASE_URL")?;
        let host = get_env_or_default("CATALOGUE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOGUE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CATALOGUE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOGUE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("CATALOGUE_BASE_URL", "http://localhost:3000");
        let session_secret = get_validated_secret("CATALOGUE_SESSION_SECRET")?;
        let books_api_base_url =
            get_env_or_default("BOOKS_API_BASE_URL", "https://www.googleapis.com/books/v1");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            books_api_base_url,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret meets minimum length and is not a placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn strong_secret() -> String {
        "q8Kj2mNpX7vRwLtYbZ4cF9hD6gS3aEuW0iOrT5n".to_string()
    }

    #[test]
    fn test_validate_secret_strength_too_short() {
        let result = validate_secret_strength("short", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-session-key-here-padded-to-length", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        let result = validate_secret_strength("changeme123-changeme123-changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength(&strong_secret(), "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = CatalogueConfig {
            database_url: SecretString::from("sqlite://bookden.db"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from(strong_secret()),
            books_api_base_url: "https://www.googleapis.com/books/v1".to_string(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_database_url_is_not_printed_by_debug() {
        let config = CatalogueConfig {
            database_url: SecretString::from("sqlite:///var/lib/bookden/live.db"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from(strong_secret()),
            books_api_base_url: "https://www.googleapis.com/books/v1".to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("live.db"));
        assert!(!debug_output.contains(&strong_secret()));
    }
}
