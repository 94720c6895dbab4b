//! Integration test harness for Bookden.
//!
//! Spawns the real application on a loopback port, backed by a throwaway
//! `SQLite` database and a stub book-metadata server, so the full
//! register → login → add → list → delete journey can be driven over HTTP
//! without touching the network.
//!
//! # Example
//!
//! ```rust,ignore
//! let app = TestApp::spawn(StubVolumes::new().volume(
//!     "9780140449136",
//!     serde_json::json!({"title": "The Odyssey", "authors": ["Homer"]}),
//! ))
//! .await;
//!
//! let client = client();
//! let resp = client
//!     .post(app.url("/login"))
//!     .form(&[("username", "alice"), ("password", "pw1")])
//!     .send()
//!     .await?;
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use secrecy::SecretString;
use sqlx::SqlitePool;
use uuid::Uuid;

use bookden_catalogue::config::CatalogueConfig;
use bookden_catalogue::state::AppState;
use bookden_catalogue::{build_app, db};

/// Canned responses for the stub volumes API.
///
/// ISBNs registered with [`StubVolumes::volume`] answer with a single-item
/// response; everything else answers with zero items. A failing stub answers
/// 500 to every query.
#[derive(Debug, Default)]
pub struct StubVolumes {
    volumes: HashMap<String, serde_json::Value>,
    fail: bool,
}

impl StubVolumes {
    /// A stub that knows no volumes (every lookup finds zero items).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the `volumeInfo` object returned for an ISBN.
    #[must_use]
    pub fn volume(mut self, isbn: &str, volume_info: serde_json::Value) -> Self {
        self.volumes.insert(isbn.to_string(), volume_info);
        self
    }

    /// Make every lookup fail with HTTP 500.
    #[must_use]
    pub const fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

/// Stub volumes endpoint, mimicking `GET /volumes?q=isbn:<isbn>`.
async fn volumes(
    State(stub): State<Arc<StubVolumes>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if stub.fail {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let q = params.get("q").cloned().unwrap_or_default();
    let isbn = q.strip_prefix("isbn:").unwrap_or(&q);

    match stub.volumes.get(isbn) {
        Some(info) => Json(serde_json::json!({
            "kind": "books#volumes",
            "totalItems": 1,
            "items": [{"volumeInfo": info}],
        }))
        .into_response(),
        None => Json(serde_json::json!({
            "kind": "books#volumes",
            "totalItems": 0,
        }))
        .into_response(),
    }
}

/// A running application instance under test.
pub struct TestApp {
    /// Base URL of the spawned application (e.g., `http://127.0.0.1:54321`).
    pub base_url: String,
    /// Pool connected to the application's database, for direct assertions.
    pub pool: SqlitePool,
}

impl TestApp {
    /// Spawn the application and its stub metadata server.
    ///
    /// # Panics
    ///
    /// Panics if any part of the setup fails; tests cannot proceed without it.
    pub async fn spawn(stub: StubVolumes) -> Self {
        let stub_addr = spawn_server(
            Router::new()
                .route("/volumes", get(volumes))
                .with_state(Arc::new(stub)),
        )
        .await;

        let db_path = std::env::temp_dir().join(format!("bookden-test-{}.db", Uuid::new_v4()));
        let config = CatalogueConfig {
            database_url: SecretString::from(format!(
                "sqlite://{}?mode=rwc",
                db_path.display()
            )),
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            base_url: "http://localhost".to_string(),
            session_secret: SecretString::from("q8Kj2mNpX7vRwLtYbZ4cF9hD6gS3aEuW0iOrT5n"),
            books_api_base_url: format!("http://{stub_addr}"),
        };

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("create pool");
        db::init_schema(&pool).await.expect("schema bootstrap");

        let state = AppState::new(config, pool.clone()).expect("application state");
        let app = build_app(state).await.expect("build app");
        let addr = spawn_server(app).await;

        Self {
            base_url: format!("http://{addr}"),
            pool,
        }
    }

    /// Build a full URL for a path on the app under test.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Number of book records in the database.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn book_count(&self) -> i64 {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .expect("count books");
        count.0
    }

    /// ID of the only book record, if exactly one exists.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn sole_book_id(&self) -> Option<i64> {
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM books")
            .fetch_all(&self.pool)
            .await
            .expect("list book ids");
        match ids.as_slice() {
            [(id,)] => Some(*id),
            _ => None,
        }
    }
}

/// Bind an ephemeral loopback port and serve the router on it.
async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    addr
}

/// A browser-like HTTP client: follows redirects and keeps cookies.
///
/// Each call returns an independent session; use two clients to act as two
/// different users.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("build HTTP client")
}
