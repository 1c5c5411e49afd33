use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecentTracksResponse {
    pub recenttracks: RecentTracks,
}

#[derive(Debug, Deserialize)]
pub struct RecentTracks {
    #[serde(default)]
    pub track: Vec<RecentTrack>,
}

/// One scrobble from `user.getRecentTracks`. Only the strings fed back into
/// the music-service search are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentTrack {
    pub name: String,
    pub artist: RecentTrackArtist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentTrackArtist {
    #[serde(rename = "#text")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_tracks_parse_hash_text_artist() {
        let response: RecentTracksResponse = serde_json::from_value(serde_json::json!({
            "recenttracks": {
                "track": [
                    {
                        "name": "Karma Police",
                        "artist": { "#text": "Radiohead", "mbid": "" },
                        "album": { "#text": "OK Computer" },
                    },
                ],
                "@attr": { "user": "someone", "total": "1" },
            },
        }))
        .unwrap();

        let track = &response.recenttracks.track[0];
        assert_eq!(track.name, "Karma Police");
        assert_eq!(track.artist.name, "Radiohead");
    }

    #[test]
    fn empty_history_parses_to_empty_list() {
        let response: RecentTracksResponse = serde_json::from_value(serde_json::json!({
            "recenttracks": { "@attr": { "user": "someone", "total": "0" } },
        }))
        .unwrap();
        assert!(response.recenttracks.track.is_empty());
    }
}
