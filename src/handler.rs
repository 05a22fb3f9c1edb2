use std::sync::Arc;

use crate::extract::{extract_album, Extraction, ImagePattern};
use crate::fetch::PageFetcher;
use crate::models::AlbumResponse;

// ── Messages ─────────────────────────────────────────────────────────────────

pub const MISSING_ALBUM_MESSAGE: &str = "Missing albumUrl query parameter.";
pub const NOT_FOUND_MESSAGE: &str =
    "No images found. Please ensure the album is public and the URL is correct.";
pub const DRIFT_MESSAGE: &str =
    "No images found. The album page was readable but its format may have changed.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch image URLs.";

// ── Handler ──────────────────────────────────────────────────────────────────

pub struct AlbumHandler {
    fetcher: Arc<dyn PageFetcher>,
    pattern: ImagePattern,
    default_album: Option<String>,
}

impl AlbumHandler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, pattern: ImagePattern) -> Self {
        Self {
            fetcher,
            pattern,
            default_album: None,
        }
    }

    /// Album used when the caller supplies none.
    pub fn with_default_album(mut self, album_url: impl Into<String>) -> Self {
        self.default_album = Some(album_url.into());
        self
    }

    pub async fn handle(&self, album_ref: Option<&str>) -> AlbumResponse {
        let album_url = match album_ref
            .filter(|s| !s.is_empty())
            .or(self.default_album.as_deref())
        {
            Some(url) => url,
            None => {
                return AlbumResponse::BadRequest {
                    message: MISSING_ALBUM_MESSAGE.to_string(),
                }
            }
        };

        let html = match self.fetcher.fetch_page(album_url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(album_url, error = %e, "Error fetching image URLs");
                return AlbumResponse::ServerError {
                    message: FETCH_FAILED_MESSAGE.to_string(),
                    detail: e.to_string(),
                };
            }
        };

        match extract_album(&html, &self.pattern) {
            Extraction::Found(urls) => {
                tracing::info!(album_url, count = urls.len(), "extracted album images");
                AlbumResponse::Success { urls }
            }
            Extraction::Empty => {
                tracing::warn!(album_url, "no images found in album page");
                AlbumResponse::NotFound {
                    message: NOT_FOUND_MESSAGE.to_string(),
                }
            }
            Extraction::PossibleDrift => {
                tracing::warn!(
                    album_url,
                    pattern = self.pattern.version(),
                    page_len = html.len(),
                    "album page has script data but no pattern matches; markup may have drifted"
                );
                AlbumResponse::NotFound {
                    message: DRIFT_MESSAGE.to_string(),
                }
            }
        }
    }
}
