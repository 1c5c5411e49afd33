//! Response shapes and the projection helpers that build them.
//!
//! Everything here is pure: the aggregator fetches, these functions reshape.

use serde::Serialize;

use crate::yandex::models::{Album, Artist, Track};

const COVER_SIZE: &str = "1000x1000";

/// Builds the square cover URL from an upstream cover URI by replacing the
/// trailing size placeholder (the URI's last two characters) with a fixed
/// size.
pub fn cover_url(cover_uri: &str) -> String {
    let keep = cover_uri.chars().count().saturating_sub(2);
    let trimmed: String = cover_uri.chars().take(keep).collect();
    format!("https://{trimmed}{COVER_SIZE}")
}

/// Extracts the numeric track identifier from a composite "id:album" string
/// (or a bare "id").
pub fn parse_track_id(raw: &str) -> Option<u64> {
    raw.split(':').next().and_then(|lead| lead.parse().ok())
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub track_id: u64,
    pub title: String,
    pub artist: String,
    pub img: String,
    pub duration: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub download_link: String,
}

impl TrackSummary {
    /// Projects an upstream track plus its resolved download link into the
    /// response shape. `None` when the track is missing any field the
    /// projection needs.
    pub fn from_track(track: &Track, download_link: String) -> Option<Self> {
        let track_id = parse_track_id(&track.track_id())?;
        let duration = track.duration_ms? / 1000;
        Some(Self {
            track_id,
            title: track.title.clone(),
            artist: track.artists_name().join(", "),
            img: cover_url(track.cover_uri.as_deref()?),
            duration,
            minutes: duration / 60,
            seconds: duration % 60,
            download_link,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumSummary {
    pub title: String,
    pub artists: String,
    pub track_count: u32,
    pub img: String,
    pub tracks: Vec<u64>,
}

impl AlbumSummary {
    /// First volume only; further discs are ignored.
    pub fn from_album(album: &Album) -> Option<Self> {
        let volume = album.volumes.as_ref()?.first()?;
        let tracks = volume
            .iter()
            .map(|track| parse_track_id(&track.track_id()))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            title: album.title.clone(),
            artists: album.artists_name().join(", "),
            track_count: album.track_count?,
            img: cover_url(album.cover_uri.as_deref()?),
            tracks,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistSummary {
    pub id: u64,
    pub name: String,
    pub cover_url: String,
    pub genres: Vec<String>,
    pub albums: Vec<u64>,
    pub tracks: Vec<u64>,
}

impl ArtistSummary {
    pub fn from_parts(artist: &Artist, albums: &[Album], tracks: &[Track]) -> Option<Self> {
        Some(Self {
            id: artist.id?,
            name: artist.name.clone(),
            cover_url: cover_url(artist.cover.as_ref()?.uri.as_deref()?),
            genres: artist.genres.clone(),
            albums: albums.iter().map(|album| album.id).collect(),
            tracks: tracks
                .iter()
                .map(|track| parse_track_id(&track.track_id()))
                .collect::<Option<Vec<_>>>()?,
        })
    }
}

/// Paged view over the caller's liked tracks. `skipped` and `count` always
/// echo the request, whatever the window actually contained.
#[derive(Debug, Clone, Serialize)]
pub struct FavouriteTracks {
    pub skipped: usize,
    pub count: usize,
    pub total: usize,
    pub tracks: Vec<TrackSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub message: serde_json::Value,
}
