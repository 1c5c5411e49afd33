use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::yandex::models::{
    Album, Artist, ArtistAlbums, ArtistTracks, DownloadInfo, DownloadTarget, Feed, Likes,
    NewReleases, Queue, QueueItem, QueueList, Search, StationEntry, StationTracks, Status, Track,
    TrackShort,
};

const API_BASE: &str = "https://api.music.yandex.net";

// Signing salt for direct download links, fixed by the upstream service.
const DOWNLOAD_SALT: &str = "XGRlBW9FXlekgbPrRHuSiA";

// The queues endpoints refuse requests without a device description.
const DEVICE_HEADER: &str =
    "os=Rust; os_version=; manufacturer=; model=ymusic-gateway; clid=; device_id=random; uuid=random";

/// Every API payload is wrapped in an invocation envelope; only `result`
/// and `error` matter to the gateway.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    name: Option<String>,
    message: Option<String>,
}

/// Request-scoped authenticated session against the Yandex Music API.
///
/// Built fresh from the caller's OAuth token on every request; never pooled
/// or shared. `init` validates the token and resolves the account uid the
/// likes endpoints address the user by.
pub struct YandexClient {
    http: Client,
    token: String,
    uid: u64,
}

impl YandexClient {
    pub async fn init(token: &str) -> Result<Self> {
        let mut client = Self {
            http: Client::new(),
            token: token.to_string(),
            uid: 0,
        };

        let status: Status = client.get_result(&format!("{API_BASE}/account/status")).await?;
        client.uid = status
            .account
            .uid
            .ok_or_else(|| AppError::YandexApi("token is not tied to a user account".to_string()))?;

        debug!(
            "Yandex Music session ready for uid {} ({})",
            client.uid,
            status.account.login.as_deref().unwrap_or("unknown login")
        );

        Ok(client)
    }

    pub async fn tracks(&self, track_ids: &[String]) -> Result<Vec<Track>> {
        let form = [
            ("track-ids", track_ids.join(",")),
            ("with-positions", "false".to_string()),
        ];
        self.post_result(&format!("{API_BASE}/tracks"), &form).await
    }

    pub async fn liked_tracks(&self) -> Result<Vec<TrackShort>> {
        let likes: Likes = self
            .get_result(&format!("{API_BASE}/users/{}/likes/tracks", self.uid))
            .await?;
        Ok(likes.library.tracks)
    }

    pub async fn album_with_tracks(&self, album_id: u64) -> Result<Album> {
        self.get_result(&format!("{API_BASE}/albums/{album_id}/with-tracks"))
            .await
    }

    pub async fn feed(&self) -> Result<Feed> {
        self.get_result(&format!("{API_BASE}/feed")).await
    }

    pub async fn search(&self, text: &str) -> Result<Search> {
        let url = format!(
            "{API_BASE}/search?text={}&nocorrect=false&type=all&page=0",
            urlencoding::encode(text)
        );
        self.get_result(&url).await
    }

    pub async fn rotor_stations_list(&self) -> Result<Vec<StationEntry>> {
        self.get_result(&format!("{API_BASE}/rotor/stations/list")).await
    }

    pub async fn rotor_station_tracks(&self, station_id: &str) -> Result<StationTracks> {
        self.get_result(&format!(
            "{API_BASE}/rotor/station/{station_id}/tracks?settings2=true"
        ))
        .await
    }

    /// Reports the start of a radio session for a station. The upstream
    /// expects this before the returned batch is considered played.
    pub async fn rotor_station_feedback_radio_started(
        &self,
        station_id: &str,
        id_for_from: &str,
        batch_id: &str,
    ) -> Result<()> {
        let url = format!("{API_BASE}/rotor/station/{station_id}/feedback?batch-id={batch_id}");
        let payload = serde_json::json!({
            "type": "radioStarted",
            "timestamp": chrono::Utc::now().timestamp(),
            "from": id_for_from,
        });

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("OAuth {}", self.token))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Radio feedback rejected ({status}): {body}");
            return Err(AppError::YandexApi(format!("radio feedback rejected: {status}")));
        }
        Ok(())
    }

    pub async fn new_releases(&self) -> Result<Vec<u64>> {
        let landing: NewReleases = self
            .get_result(&format!("{API_BASE}/landing3/new-releases"))
            .await?;
        Ok(landing.new_releases)
    }

    pub async fn queues(&self) -> Result<Vec<QueueItem>> {
        let response = self
            .http
            .get(format!("{API_BASE}/queues"))
            .header("Authorization", format!("OAuth {}", self.token))
            .header("X-Yandex-Music-Device", DEVICE_HEADER)
            .send()
            .await?;
        let list: QueueList = Self::parse(response).await?;
        Ok(list.queues)
    }

    pub async fn queue(&self, queue_id: &str) -> Result<Queue> {
        self.get_result(&format!("{API_BASE}/queues/{queue_id}")).await
    }

    pub async fn artists(&self, artist_id: u64) -> Result<Vec<Artist>> {
        let form = [("artist-ids", artist_id.to_string())];
        self.post_result(&format!("{API_BASE}/artists"), &form).await
    }

    pub async fn artist_tracks(&self, artist_id: u64) -> Result<Vec<Track>> {
        let tracks: ArtistTracks = self
            .get_result(&format!(
                "{API_BASE}/artists/{artist_id}/tracks?page=0&page-size=20"
            ))
            .await?;
        Ok(tracks.tracks)
    }

    pub async fn artist_direct_albums(&self, artist_id: u64) -> Result<Vec<Album>> {
        let albums: ArtistAlbums = self
            .get_result(&format!(
                "{API_BASE}/artists/{artist_id}/direct-albums?page=0&page-size=20&sort-by=year"
            ))
            .await?;
        Ok(albums.albums)
    }

    pub async fn like_track(&self, track_id: u64) -> Result<serde_json::Value> {
        let form = [("track-ids", track_id.to_string())];
        self.post_result(
            &format!("{API_BASE}/users/{}/likes/tracks/add-multiple", self.uid),
            &form,
        )
        .await
    }

    pub async fn unlike_track(&self, track_id: u64) -> Result<serde_json::Value> {
        let form = [("track-ids", track_id.to_string())];
        self.post_result(
            &format!("{API_BASE}/users/{}/likes/tracks/remove", self.uid),
            &form,
        )
        .await
    }

    pub async fn download_info(&self, track_id: &str) -> Result<Vec<DownloadInfo>> {
        self.get_result(&format!("{API_BASE}/tracks/{track_id}/download-info"))
            .await
    }

    /// Resolves a download-info URL into the direct mp3 link. The target
    /// payload is signed locally the same way the official clients do.
    pub async fn direct_link(&self, download_info_url: &str) -> Result<String> {
        let url = format!("{download_info_url}&format=json");
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("OAuth {}", self.token))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Download target fetch failed ({status})");
            return Err(AppError::YandexApi(format!("download target fetch failed: {status}")));
        }

        let target: DownloadTarget = response.json().await?;
        Ok(build_direct_link(&target))
    }

    async fn get_result<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("OAuth {}", self.token))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn post_result<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .post(url)
            .header("Authorization", format!("OAuth {}", self.token))
            .form(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Yandex Music API returned {status}: {body}");
            return Err(AppError::YandexApi(format!("unexpected status {status}")));
        }

        let envelope: Envelope<T> = response.json().await?;
        if let Some(error) = envelope.error {
            let name = error.name.unwrap_or_else(|| "unknown".to_string());
            let message = error.message.unwrap_or_default();
            warn!("Yandex Music API error {name}: {message}");
            return Err(AppError::YandexApi(name));
        }

        envelope
            .result
            .ok_or_else(|| AppError::YandexApi("response carried no result".to_string()))
    }
}

fn build_direct_link(target: &DownloadTarget) -> String {
    let path_tail = target.path.get(1..).unwrap_or_default();
    let sign = md5::compute(format!("{DOWNLOAD_SALT}{path_tail}{}", target.s));
    format!("https://{}/get-mp3/{sign:x}/{}{}", target.host, target.ts, target.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> DownloadTarget {
        DownloadTarget {
            host: "s23iva.storage.yandex.net".to_string(),
            path: "/rmusic/U2FsdGVkX1/12345".to_string(),
            ts: "0005bc3a".to_string(),
            s: "6e9a3f7".to_string(),
        }
    }

    #[test]
    fn direct_link_carries_host_ts_and_path() {
        let link = build_direct_link(&target());
        assert!(link.starts_with("https://s23iva.storage.yandex.net/get-mp3/"));
        assert!(link.ends_with("/0005bc3a/rmusic/U2FsdGVkX1/12345"));
    }

    #[test]
    fn direct_link_sign_is_lowercase_md5_hex() {
        let link = build_direct_link(&target());
        let sign = link
            .trim_start_matches("https://s23iva.storage.yandex.net/get-mp3/")
            .split('/')
            .next()
            .unwrap();
        assert_eq!(sign.len(), 32);
        assert!(sign.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn direct_link_tolerates_empty_path() {
        let mut empty = target();
        empty.path = String::new();
        let link = build_direct_link(&empty);
        assert!(link.starts_with("https://s23iva.storage.yandex.net/get-mp3/"));
        assert!(link.ends_with("/0005bc3a"));
    }

    #[test]
    fn envelope_error_beats_result() {
        let envelope: Envelope<Status> = serde_json::from_value(serde_json::json!({
            "invocationInfo": { "req-id": "abc" },
            "error": { "name": "session-expired", "message": "session has expired" },
        }))
        .unwrap();
        assert!(envelope.result.is_none());
        assert_eq!(envelope.error.unwrap().name.as_deref(), Some("session-expired"));
    }
}
