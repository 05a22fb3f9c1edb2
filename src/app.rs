use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};

use crate::config::Config;
use crate::fetch::PageFetcher;
use crate::handler::{AlbumHandler, FETCH_FAILED_MESSAGE};
use crate::models::{AlbumQuery, AlbumResponse};

#[derive(Clone)]
pub struct AppState {
    /// Serves `/photos`; the caller always names the album.
    pub photos: Arc<AlbumHandler>,
    /// Serves `/album`; falls back to the configured default album.
    pub pinned: Option<Arc<AlbumHandler>>,
}

impl AppState {
    pub fn from_config(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let photos = AlbumHandler::new(fetcher.clone(), config.pattern.clone());
        let pinned = config.default_album_url.as_ref().map(|album_url| {
            Arc::new(
                AlbumHandler::new(fetcher.clone(), config.pattern.clone())
                    .with_default_album(album_url.clone()),
            )
        });

        Self {
            photos: Arc::new(photos),
            pinned,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/photos", get(photos_endpoint));
    if state.pinned.is_some() {
        router = router.route("/album", get(pinned_album_endpoint));
    }

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET]);

    router
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().on_response(
                DefaultOnResponse::new()
                    .level(tracing::Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
        )
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn photos_endpoint(
    State(state): State<AppState>,
    Query(query): Query<AlbumQuery>,
) -> AlbumResponse {
    state.photos.handle(query.album_url.as_deref()).await
}

async fn pinned_album_endpoint(
    State(state): State<AppState>,
    Query(query): Query<AlbumQuery>,
) -> AlbumResponse {
    match &state.pinned {
        Some(handler) => handler.handle(query.album_url.as_deref()).await,
        None => AlbumResponse::NotFound {
            message: "No default album is configured.".to_string(),
        },
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    tracing::error!(%detail, "panic while handling album request");

    AlbumResponse::ServerError {
        message: FETCH_FAILED_MESSAGE.to_string(),
        detail,
    }
    .into_response()
}
