use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::lastfm::models::{RecentTrack, RecentTracksResponse};

const API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";

/// One-shot client for the Last.fm web API. Built per request for the
/// single "most recent scrobble" lookup; the lookup consumes the client so
/// its connections are torn down as soon as the call returns, whatever the
/// outcome.
pub struct LastfmClient {
    http: Client,
    api_key: String,
}

impl LastfmClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn recent_track(self, username: &str) -> Result<RecentTrack> {
        let response = self
            .http
            .get(API_BASE)
            .query(&[
                ("method", "user.getrecenttracks"),
                ("user", username),
                ("api_key", &self.api_key),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Last.fm lookup failed ({status}): {body}");
            return Err(AppError::LastfmApi(format!("unexpected status {status}")));
        }

        let body: RecentTracksResponse = response.json().await?;
        let track = body
            .recenttracks
            .track
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LastfmApi(format!("{username} has no recent tracks")))?;

        debug!("Most recent scrobble for {username}: {} - {}", track.artist.name, track.name);
        Ok(track)
    }
}
