//! HTTP surface of the gateway: one GET route per feature, plus the static
//! UI at the root path.
//!
//! Every handler builds its own upstream session from the caller's token
//! and a fresh [`Info`] aggregator around it; nothing is shared between
//! requests.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::info::{
    AlbumSummary, ArtistSummary, FavouriteTracks, Info, LikeResponse, TrackSummary,
};
use crate::lastfm::LastfmClient;
use crate::yandex::YandexClient;

#[derive(Clone)]
struct AppState {
    config: Config,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    ya_token: String,
}

#[derive(Debug, Deserialize)]
struct TracksQuery {
    track_ids: String,
    ya_token: String,
}

fn default_favourites_count() -> usize {
    25
}

fn default_releases_count() -> usize {
    10
}

#[derive(Debug, Deserialize)]
struct FavouritesQuery {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_favourites_count")]
    count: usize,
    ya_token: String,
}

#[derive(Debug, Deserialize)]
struct NewReleasesQuery {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_releases_count")]
    count: usize,
    ya_token: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    request: String,
    ya_token: String,
}

#[derive(Debug, Deserialize)]
struct CurrentTrackQuery {
    ya_token: String,
    lastfm_username: Option<String>,
}

async fn session(token: &str) -> Result<Info> {
    Ok(Info::new(YandexClient::init(token).await?))
}

async fn get_song_by_id(
    Path(track_id): Path<u64>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TrackSummary>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.track_by_id(track_id).await?))
}

async fn get_tracks_by_ids(Query(query): Query<TracksQuery>) -> Result<Json<Vec<TrackSummary>>> {
    let info = session(&query.ya_token).await?;
    let ids = query
        .track_ids
        .split(',')
        .map(|raw| raw.parse::<u64>().map_err(|_| AppError::TrackById))
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(info.tracks_by_ids(&ids).await?))
}

async fn get_favourite_tracks(
    Query(query): Query<FavouritesQuery>,
) -> Result<Json<FavouriteTracks>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.favourite_tracks(query.skip, query.count).await?))
}

async fn get_album_by_id(
    Path(album_id): Path<u64>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<AlbumSummary>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.album_with_tracks(album_id).await?))
}

async fn get_tracks_from_playlist_of_the_day(
    Query(query): Query<TokenQuery>,
) -> Result<Json<Vec<TrackSummary>>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.playlist_of_the_day().await?))
}

async fn get_search(Query(query): Query<SearchQuery>) -> Result<Json<TrackSummary>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.search(&query.request).await?))
}

async fn get_track_from_station(Query(query): Query<TokenQuery>) -> Result<Json<TrackSummary>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.track_from_station().await?))
}

async fn get_new_release(
    Query(query): Query<NewReleasesQuery>,
) -> Result<Json<Vec<AlbumSummary>>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.new_releases(query.skip, query.count).await?))
}

async fn get_current_track(
    State(state): State<AppState>,
    Query(query): Query<CurrentTrackQuery>,
) -> Result<Json<TrackSummary>> {
    let client = YandexClient::init(&query.ya_token).await?;
    let mut info = match query.lastfm_username {
        Some(username) => Info::with_lastfm(
            client,
            LastfmClient::new(&state.config.lastfm_api_key),
            username,
        ),
        None => Info::new(client),
    };
    Ok(Json(info.current_track().await?))
}

async fn get_artist(
    Path(artist_id): Path<u64>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<ArtistSummary>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.artist_info(artist_id).await?))
}

async fn like_track(
    Path(track_id): Path<u64>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<LikeResponse>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.like_track(track_id).await?))
}

async fn dislike_track(
    Path(track_id): Path<u64>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<LikeResponse>> {
    let info = session(&query.ya_token).await?;
    Ok(Json(info.unlike_track(track_id).await?))
}

pub fn router(config: Config) -> Router {
    let static_files =
        ServeDir::new(&config.static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/song/:track_id", get(get_song_by_id))
        .route("/songs", get(get_tracks_by_ids))
        .route("/favourite_songs", get(get_favourite_tracks))
        .route("/album/:album_id", get(get_album_by_id))
        .route("/playlist_of_the_day", get(get_tracks_from_playlist_of_the_day))
        .route("/search", get(get_search))
        .route("/get_track_from_station", get(get_track_from_station))
        .route("/new_release", get(get_new_release))
        .route("/current_track", get(get_current_track))
        .route("/artist/:artist_id", get(get_artist))
        .route("/like_track/:track_id", get(like_track))
        .route("/dislike_track/:track_id", get(dislike_track))
        .fallback_service(static_files)
        .with_state(AppState { config })
}

pub async fn serve(config: Config) -> Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");
    axum::serve(listener, router(config)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn favourites_query_defaults_match_endpoint_contract() {
        let query: FavouritesQuery =
            serde_json::from_value(serde_json::json!({ "ya_token": "t" })).unwrap();
        assert_eq!(query.skip, 0);
        assert_eq!(query.count, 25);
    }

    #[test]
    fn new_releases_query_defaults_match_endpoint_contract() {
        let query: NewReleasesQuery =
            serde_json::from_value(serde_json::json!({ "ya_token": "t" })).unwrap();
        assert_eq!(query.skip, 0);
        assert_eq!(query.count, 10);
    }

    #[test]
    fn router_builds_with_default_config() {
        let config = Config::new("127.0.0.1".to_string(), 8000, PathBuf::from("./static"));
        let _router = router(config);
    }
}
