use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch track info")]
    TrackInfo,

    #[error("Failed to fetch track info by ID")]
    TrackById,

    #[error("Failed to fetch download link")]
    DownloadLink,

    #[error("Failed to fetch favourite tracks")]
    FavouriteTracks,

    #[error("Failed to fetch album info")]
    AlbumInfo,

    #[error("Failed to fetch playlist of the day")]
    PlaylistOfDay,

    #[error("Failed to search tracks")]
    Search,

    #[error("Failed to fetch track from station")]
    Station,

    #[error("Failed to fetch new releases")]
    NewReleases,

    #[error("Failed to fetch current track")]
    CurrentTrack,

    #[error("Failed to fetch artist info")]
    ArtistInfo,

    #[error("Failed to like track")]
    Like,

    #[error("Failed to unlike track")]
    Unlike,

    #[error("Yandex Music API error: {0}")]
    YandexApi(String),

    #[error("Last.fm API error: {0}")]
    LastfmApi(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Every failure surfaces as HTTP 500 with a `{"detail": ...}` body. The
/// per-operation variants carry the fixed message; nothing upstream-specific
/// leaks into the response beyond what the variant displays.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_body(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn operation_failure_is_500_with_fixed_detail() {
        let (status, body) = response_body(AppError::TrackInfo).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "detail": "Failed to fetch track info" }));
    }

    #[tokio::test]
    async fn every_operation_variant_maps_to_500() {
        for error in [
            AppError::TrackById,
            AppError::DownloadLink,
            AppError::FavouriteTracks,
            AppError::AlbumInfo,
            AppError::PlaylistOfDay,
            AppError::Search,
            AppError::Station,
            AppError::NewReleases,
            AppError::CurrentTrack,
            AppError::ArtistInfo,
            AppError::Like,
            AppError::Unlike,
        ] {
            let (status, body) = response_body(error).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body["detail"].is_string());
        }
    }

    #[tokio::test]
    async fn like_and_unlike_have_distinct_details() {
        let (_, like) = response_body(AppError::Like).await;
        let (_, unlike) = response_body(AppError::Unlike).await;
        assert_eq!(like["detail"], "Failed to like track");
        assert_eq!(unlike["detail"], "Failed to unlike track");
    }
}
