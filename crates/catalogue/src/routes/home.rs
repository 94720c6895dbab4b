//! Entry page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect, Response};

use crate::middleware::OptionalAuth;

/// Entry page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// Display the entry page, or send an authenticated caller to their books.
pub async fn home(OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        Redirect::to("/dashboard").into_response()
    } else {
        IndexTemplate.into_response()
    }
}
