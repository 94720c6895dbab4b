//! Google Books API client for ISBN metadata lookup.
//!
//! One unconditional GET per lookup; no caching and no retry. Identical
//! ISBNs looked up twice issue two identical outbound calls.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when looking up book metadata.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Descriptive fields resolved for an ISBN.
///
/// Every field carries the documented fallback so a sparse API response
/// still produces a complete record.
#[derive(Debug, Clone, PartialEq)]
pub struct BookMetadata {
    /// Title ("N/A" when absent).
    pub title: String,
    /// Comma-joined contributing authors ("Unknown" when absent).
    pub author: String,
    /// Page count (0 when absent).
    pub page_count: i64,
    /// Average rating (0 when absent).
    pub average_rating: f64,
    /// Cover thumbnail URL (empty when absent).
    pub thumbnail_url: String,
}

/// Book metadata lookup client.
#[derive(Clone)]
pub struct BooksClient {
    client: reqwest::Client,
    base_url: String,
}

impl BooksClient {
    /// Create a new lookup client against the given API base URL
    /// (e.g., `https://www.googleapis.com/books/v1`).
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up a volume by ISBN.
    ///
    /// The ISBN is passed through exactly as submitted; a non-ISBN string
    /// simply finds no volumes. Returns `Ok(None)` when the service responds
    /// successfully with zero matching items.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Http` on transport failure,
    /// `LookupError::Api` on a non-success status, and
    /// `LookupError::Parse` if the response body is not valid JSON.
    pub async fn lookup(&self, isbn: &str) -> Result<Option<BookMetadata>, LookupError> {
        let url = format!(
            "{}/volumes?q=isbn:{}",
            self.base_url,
            urlencoding::encode(isbn)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LookupError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let volumes: VolumesResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(volumes.into_first_match())
    }
}

/// Top-level volumes response.
#[derive(Debug, Deserialize)]
struct VolumesResponse {
    /// Matching volumes; omitted entirely when there are zero matches.
    items: Option<Vec<Volume>>,
}

impl VolumesResponse {
    /// Extract metadata from the first matching volume, if any.
    fn into_first_match(self) -> Option<BookMetadata> {
        let volume = self.items?.into_iter().next()?;
        Some(BookMetadata::from(volume.volume_info))
    }
}

/// One matching volume.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

/// Descriptive fields of a volume; every field may be absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    page_count: Option<i64>,
    average_rating: Option<f64>,
    image_links: Option<ImageLinks>,
}

/// Nested image-links structure; may itself be absent.
#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl From<VolumeInfo> for BookMetadata {
    fn from(info: VolumeInfo) -> Self {
        Self {
            title: info.title.unwrap_or_else(|| "N/A".to_owned()),
            author: info
                .authors
                .map_or_else(|| "Unknown".to_owned(), |authors| authors.join(", ")),
            page_count: info.page_count.unwrap_or(0),
            average_rating: info.average_rating.unwrap_or(0.0),
            thumbnail_url: info
                .image_links
                .and_then(|links| links.thumbnail)
                .unwrap_or_default(),
        }
    }
}
