use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct AlbumQuery {
    #[serde(rename = "albumUrl", alias = "album_url")]
    pub album_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Outcome of one album request, mapped one-to-one onto an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumResponse {
    Success { urls: Vec<String> },
    BadRequest { message: String },
    NotFound { message: String },
    ServerError { message: String, detail: String },
}

impl AlbumResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            AlbumResponse::Success { .. } => StatusCode::OK,
            AlbumResponse::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AlbumResponse::NotFound { .. } => StatusCode::NOT_FOUND,
            AlbumResponse::ServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AlbumResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AlbumResponse::Success { urls } => (status, Json(urls)).into_response(),
            AlbumResponse::BadRequest { message } | AlbumResponse::NotFound { message } => (
                status,
                Json(ErrorBody {
                    error: message,
                    details: None,
                }),
            )
                .into_response(),
            AlbumResponse::ServerError { message, detail } => (
                status,
                Json(ErrorBody {
                    error: message,
                    details: Some(detail),
                }),
            )
                .into_response(),
        }
    }
}
