//! HTTP route handlers for the catalogue.
//!
//! # Route Structure
//!
//! ```text
//! GET  /              - Entry page (redirects to /dashboard when logged in)
//! GET  /health        - Liveness check
//! GET  /health/ready  - Readiness check (database connectivity)
//!
//! # Auth
//! GET  /register      - Registration page
//! POST /register      - Create account
//! GET  /login         - Login page
//! POST /login         - Authenticate, establish session
//! GET  /logout        - Tear down session (idempotent)
//!
//! # Catalogue (requires auth)
//! GET  /dashboard     - List saved books
//! POST /dashboard     - Add a book by ISBN
//! GET  /delete/{id}   - Delete a saved book
//! ```

pub mod auth;
pub mod dashboard;
pub mod home;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the catalogue routes router.
pub fn catalogue_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/dashboard",
            get(dashboard::dashboard).post(dashboard::add_book),
        )
        .route("/delete/{id}", get(dashboard::delete_book))
}

/// Create all routes for the catalogue.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Entry page
        .route("/", get(home::home))
        // Auth routes
        .merge(auth_routes())
        // Catalogue routes
        .merge(catalogue_routes())
}
