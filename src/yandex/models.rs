//! Wire types for the Yandex Music API.
//!
//! Only the fields the gateway actually projects are modelled; everything
//! else in the upstream payloads is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Track identifiers arrive as a JSON string in some endpoints and as a
/// number in others. Normalize both to a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::String(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn option_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::String(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// Composite "track:album" identifier, the form the tracks endpoint accepts
/// and the form all identifier parsing starts from.
fn composite_id(id: &str, album_id: Option<&str>) -> String {
    match album_id {
        Some(album_id) => format!("{id}:{album_id}"),
        None => id.to_string(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub account: Account,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub uid: Option<u64>,
    pub login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub duration_ms: Option<u64>,
    pub cover_uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub albums: Vec<Album>,
}

impl Track {
    /// "track:album" when the track carries album context, bare id otherwise.
    pub fn track_id(&self) -> String {
        let album_id = self.albums.first().map(|album| album.id.to_string());
        composite_id(&self.id, album_id.as_deref())
    }

    pub fn artists_name(&self) -> Vec<String> {
        self.artists.iter().map(|artist| artist.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    pub cover: Option<Cover>,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cover {
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub track_count: Option<u32>,
    pub cover_uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// Disc-grouped track listing, only present on with-tracks fetches.
    pub volumes: Option<Vec<Vec<Track>>>,
}

impl Album {
    pub fn artists_name(&self) -> Vec<String> {
        self.artists.iter().map(|artist| artist.name.clone()).collect()
    }
}

/// Entry of the liked-tracks library and of generated playlists: an
/// identifier pair to be resolved into a full [`Track`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackShort {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub album_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrackShort {
    pub fn track_id(&self) -> String {
        composite_id(&self.id, self.album_id.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Likes {
    pub library: LikesLibrary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesLibrary {
    #[serde(default)]
    pub tracks: Vec<TrackShort>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    #[serde(default)]
    pub generated_playlists: Vec<GeneratedPlaylist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlaylist {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub data: Option<Playlist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[serde(default)]
    pub tracks: Vec<TrackShort>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Search {
    pub best: Option<Best>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Best {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub result: Option<Track>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReleases {
    #[serde(default)]
    pub new_releases: Vec<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationEntry {
    pub station: Station,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: StationId,
    #[serde(default)]
    pub id_for_from: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationId {
    #[serde(rename = "type")]
    pub kind: String,
    pub tag: String,
}

impl Station {
    /// "type:tag", the form the rotor tracks endpoint addresses stations by.
    pub fn full_id(&self) -> String {
        format!("{}:{}", self.id.kind, self.id.tag)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationTracks {
    #[serde(default)]
    pub sequence: Vec<SequenceItem>,
    #[serde(default)]
    pub batch_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceItem {
    pub track: Track,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueList {
    #[serde(default)]
    pub queues: Vec<QueueItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Queue {
    pub current_track_index: Option<usize>,
    #[serde(default)]
    pub tracks: Vec<QueueTrack>,
}

impl Queue {
    /// The queue's current playback pointer, if it has one.
    pub fn current_track(&self) -> Option<&QueueTrack> {
        self.tracks.get(self.current_track_index?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueTrack {
    #[serde(deserialize_with = "string_or_number")]
    pub track_id: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub album_id: Option<String>,
}

impl QueueTrack {
    pub fn full_id(&self) -> String {
        composite_id(&self.track_id, self.album_id.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistTracks {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistAlbums {
    #[serde(default)]
    pub albums: Vec<Album>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfo {
    #[serde(default)]
    pub codec: String,
    pub bitrate_in_kbps: Option<u32>,
    pub download_info_url: String,
}

/// Second hop of download-link resolution: the payload behind
/// `download_info_url`, fetched with `&format=json`.
#[derive(Debug, Deserialize)]
pub struct DownloadTarget {
    pub host: String,
    pub path: String,
    pub ts: String,
    pub s: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_id_tolerates_string_and_number() {
        let from_string: Track =
            serde_json::from_value(serde_json::json!({ "id": "10994777", "title": "Smooth Criminal" }))
                .unwrap();
        let from_number: Track =
            serde_json::from_value(serde_json::json!({ "id": 10994777, "title": "Smooth Criminal" }))
                .unwrap();
        assert_eq!(from_string.id, "10994777");
        assert_eq!(from_number.id, from_string.id);
    }

    #[test]
    fn track_id_is_composite_when_album_known() {
        let track: Track = serde_json::from_value(serde_json::json!({
            "id": "33311009",
            "title": "Believer",
            "albums": [{ "id": 4766812, "title": "Evolve" }],
        }))
        .unwrap();
        assert_eq!(track.track_id(), "33311009:4766812");

        let bare: Track =
            serde_json::from_value(serde_json::json!({ "id": "33311009", "title": "Believer" }))
                .unwrap();
        assert_eq!(bare.track_id(), "33311009");
    }

    #[test]
    fn liked_tracks_parse_with_timestamps() {
        let likes: Likes = serde_json::from_value(serde_json::json!({
            "library": {
                "uid": 1130000,
                "revision": 250,
                "tracks": [
                    { "id": "42197229", "albumId": "5571082", "timestamp": "2021-06-14T19:35:42+00:00" },
                    { "id": 311009, "timestamp": null },
                ],
            },
        }))
        .unwrap();
        assert_eq!(likes.library.tracks.len(), 2);
        assert_eq!(likes.library.tracks[0].track_id(), "42197229:5571082");
        assert_eq!(likes.library.tracks[1].track_id(), "311009");
        assert!(likes.library.tracks[0].timestamp.is_some());
    }

    #[test]
    fn queue_current_track_follows_index() {
        let queue: Queue = serde_json::from_value(serde_json::json!({
            "currentTrackIndex": 1,
            "tracks": [
                { "trackId": "1", "albumId": "10" },
                { "trackId": "2", "albumId": "20" },
            ],
        }))
        .unwrap();
        assert_eq!(queue.current_track().unwrap().full_id(), "2:20");
    }

    #[test]
    fn queue_without_pointer_has_no_current_track() {
        let queue: Queue =
            serde_json::from_value(serde_json::json!({ "tracks": [{ "trackId": "1" }] })).unwrap();
        assert!(queue.current_track().is_none());

        let out_of_range: Queue = serde_json::from_value(serde_json::json!({
            "currentTrackIndex": 5,
            "tracks": [{ "trackId": "1" }],
        }))
        .unwrap();
        assert!(out_of_range.current_track().is_none());
    }

    #[test]
    fn station_full_id_joins_type_and_tag() {
        let entry: StationEntry = serde_json::from_value(serde_json::json!({
            "station": {
                "id": { "type": "genre", "tag": "rock" },
                "idForFrom": "genre-rock",
            },
        }))
        .unwrap();
        assert_eq!(entry.station.full_id(), "genre:rock");
        assert_eq!(entry.station.id_for_from, "genre-rock");
    }

    #[test]
    fn search_best_is_optional() {
        let empty: Search = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.best.is_none());

        let hit: Search = serde_json::from_value(serde_json::json!({
            "best": {
                "type": "track",
                "result": { "id": "55042", "title": "Numb" },
            },
        }))
        .unwrap();
        assert_eq!(hit.best.unwrap().result.unwrap().id, "55042");
    }

    #[test]
    fn album_volumes_only_present_on_with_tracks_payloads() {
        let album: Album = serde_json::from_value(serde_json::json!({
            "id": 4766812,
            "title": "Evolve",
            "trackCount": 12,
            "coverUri": "avatars.yandex.net/get-music-content/49876/evolve/%%",
            "volumes": [[{ "id": "33311009", "title": "Believer" }]],
        }))
        .unwrap();
        assert_eq!(album.volumes.as_ref().unwrap()[0].len(), 1);

        let bare: Album =
            serde_json::from_value(serde_json::json!({ "id": 4766812, "title": "Evolve" })).unwrap();
        assert!(bare.volumes.is_none());
    }
}
