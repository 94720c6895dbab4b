//! Application services.
//!
//! - [`auth`] - Registration and login over the credential store
//! - [`books`] - External book metadata lookup

pub mod auth;
pub mod books;
