//! Authentication route handlers.
//!
//! Handles registration, login, and logout. Failures are surfaced as
//! redirect query parameters rendered as inline notices on the next page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Notice Messages
// =============================================================================

/// Map a registration error code to its inline notice.
fn register_error_message(code: &str) -> String {
    match code {
        "username_taken" => "Username already exists!",
        "invalid_username" => "That username cannot be used.",
        "empty_password" => "Password cannot be empty.",
        _ => "Registration failed. Try again.",
    }
    .to_string()
}

/// Map a login error code to its inline notice.
fn login_error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid credentials!",
        _ => "Login failed. Try again.",
    }
    .to_string()
}

/// Map a login success code to its inline notice.
fn login_success_message(code: &str) -> String {
    match code {
        "registered" => "Registration successful!",
        "logged_out" => "You have been logged out.",
        _ => "Done.",
    }
    .to_string()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(register_error_message),
    }
}

/// Handle registration form submission.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.register(&form.username, &form.password).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "account registered");
            Redirect::to("/login?success=registered").into_response()
        }
        Err(AuthError::UsernameTaken) => {
            Redirect::to("/register?error=username_taken").into_response()
        }
        Err(AuthError::InvalidUsername(e)) => {
            tracing::debug!("rejected username: {e}");
            Redirect::to("/register?error=invalid_username").into_response()
        }
        Err(AuthError::EmptyPassword) => {
            Redirect::to("/register?error=empty_password").into_response()
        }
        Err(e) => {
            tracing::error!("registration failed: {e}");
            Redirect::to("/register?error=failed").into_response()
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(login_error_message),
        success: query.success.as_deref().map(login_success_message),
    }
}

/// Handle login form submission.
///
/// Success stores the authenticated identity in the session and lands on the
/// dashboard. An unknown user and a wrong password produce the same notice.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let current_user = CurrentUser {
                id: user.id,
                username: user.username,
            };

            set_current_user(&session, &current_user)
                .await
                .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;

            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username, "failed login attempt");
            Ok(Redirect::to("/login?error=credentials").into_response())
        }
        Err(e) => {
            tracing::error!("login failed: {e}");
            Ok(Redirect::to("/login?error=failed").into_response())
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Destroys the whole session and acknowledges regardless of prior state,
/// so logging out twice is harmless.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/login?success=logged_out").into_response()
}
