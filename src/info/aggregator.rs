use rand::Rng;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::info::summary::{
    AlbumSummary, ArtistSummary, FavouriteTracks, LikeResponse, TrackSummary,
};
use crate::lastfm::LastfmClient;
use crate::yandex::models::Track;
use crate::yandex::YandexClient;

/// Takes a `[skip, skip + count)` slice; out-of-range windows yield an
/// empty tail rather than an error.
fn window<T>(items: Vec<T>, skip: usize, count: usize) -> Vec<T> {
    items.into_iter().skip(skip).take(count).collect()
}

/// The aggregation layer: one operation per endpoint, each a linear
/// sequence of upstream calls folded into a single shaped payload.
///
/// Built fresh per request around a request-scoped [`YandexClient`] session;
/// the optional Last.fm pairing only exists for the one "current track via
/// scrobble" strategy.
pub struct Info {
    client: YandexClient,
    lastfm: Option<LastfmClient>,
    lastfm_username: Option<String>,
}

impl Info {
    pub fn new(client: YandexClient) -> Self {
        Self {
            client,
            lastfm: None,
            lastfm_username: None,
        }
    }

    pub fn with_lastfm(client: YandexClient, lastfm: LastfmClient, username: String) -> Self {
        Self {
            client,
            lastfm: Some(lastfm),
            lastfm_username: Some(username),
        }
    }

    pub async fn track_by_id(&self, track_id: u64) -> Result<TrackSummary> {
        let tracks = self
            .client
            .tracks(&[track_id.to_string()])
            .await
            .map_err(|e| op_failed(e, AppError::TrackById))?;
        let track = tracks.first().ok_or(AppError::TrackById)?;
        self.track_summary(track).await.map_err(|_| AppError::TrackById)
    }

    pub async fn tracks_by_ids(&self, track_ids: &[u64]) -> Result<Vec<TrackSummary>> {
        let mut summaries = Vec::with_capacity(track_ids.len());
        for track_id in track_ids {
            summaries.push(self.track_by_id(*track_id).await?);
        }
        Ok(summaries)
    }

    pub async fn favourite_tracks(&self, skip: usize, count: usize) -> Result<FavouriteTracks> {
        let liked = self
            .client
            .liked_tracks()
            .await
            .map_err(|e| op_failed(e, AppError::FavouriteTracks))?;
        let total = liked.len();

        let ids: Vec<String> = window(liked, skip, count)
            .iter()
            .map(|short| short.track_id())
            .collect();

        let mut tracks = Vec::with_capacity(ids.len());
        if !ids.is_empty() {
            let fetched = self
                .client
                .tracks(&ids)
                .await
                .map_err(|e| op_failed(e, AppError::FavouriteTracks))?;
            for track in &fetched {
                tracks.push(self.track_summary(track).await?);
            }
        }

        debug!("Favourites window [{skip}, {}) of {total}", skip.saturating_add(count));
        Ok(FavouriteTracks {
            skipped: skip,
            count,
            total,
            tracks,
        })
    }

    pub async fn album_with_tracks(&self, album_id: u64) -> Result<AlbumSummary> {
        let album = self
            .client
            .album_with_tracks(album_id)
            .await
            .map_err(|e| op_failed(e, AppError::AlbumInfo))?;
        AlbumSummary::from_album(&album).ok_or(AppError::AlbumInfo)
    }

    pub async fn playlist_of_the_day(&self) -> Result<Vec<TrackSummary>> {
        let feed = self
            .client
            .feed()
            .await
            .map_err(|e| op_failed(e, AppError::PlaylistOfDay))?;

        let mut tracks = Vec::new();
        for playlist in feed.generated_playlists {
            if playlist.kind != "playlistOfTheDay" {
                continue;
            }
            let Some(data) = playlist.data else { continue };
            for short in data.tracks {
                let track = self.fetch_track(&short.track_id()).await?;
                tracks.push(self.track_summary(&track).await?);
            }
        }
        Ok(tracks)
    }

    pub async fn search(&self, request: &str) -> Result<TrackSummary> {
        let found = self
            .client
            .search(request)
            .await
            .map_err(|e| op_failed(e, AppError::Search))?;
        let best = found
            .best
            .and_then(|best| best.result)
            .ok_or(AppError::Search)?;
        self.track_summary(&best).await
    }

    pub async fn track_from_station(&self) -> Result<TrackSummary> {
        let stations = self
            .client
            .rotor_stations_list()
            .await
            .map_err(|e| op_failed(e, AppError::Station))?;
        if stations.is_empty() {
            warn!("Station list is empty, nothing to sample");
            return Err(AppError::Station);
        }

        let pick = rand::rng().random_range(0..stations.len());
        let station = &stations[pick].station;
        let station_id = station.full_id();
        debug!("Sampling station {station_id}");

        let batch = self
            .client
            .rotor_station_tracks(&station_id)
            .await
            .map_err(|e| op_failed(e, AppError::Station))?;
        self.client
            .rotor_station_feedback_radio_started(&station_id, &station.id_for_from, &batch.batch_id)
            .await
            .map_err(|e| op_failed(e, AppError::Station))?;

        let first = batch.sequence.first().ok_or(AppError::Station)?;
        self.track_summary(&first.track).await
    }

    pub async fn new_releases(&self, skip: usize, count: usize) -> Result<Vec<AlbumSummary>> {
        let ids = self
            .client
            .new_releases()
            .await
            .map_err(|e| op_failed(e, AppError::NewReleases))?;

        let mut releases = Vec::new();
        for album_id in window(ids, skip, count) {
            releases.push(self.album_with_tracks(album_id).await?);
        }
        Ok(releases)
    }

    pub async fn current_track(&mut self) -> Result<TrackSummary> {
        if let (Some(lastfm), Some(username)) = (self.lastfm.take(), self.lastfm_username.as_deref())
        {
            // The lookup consumes the Last.fm client, so its session dies
            // here whether or not the lookup succeeded.
            let recent = lastfm
                .recent_track(username)
                .await
                .map_err(|e| op_failed(e, AppError::CurrentTrack))?;
            let found = self
                .client
                .search(&format!("{} {}", recent.artist.name, recent.name))
                .await
                .map_err(|e| op_failed(e, AppError::CurrentTrack))?;
            let best = found
                .best
                .and_then(|best| best.result)
                .ok_or(AppError::CurrentTrack)?;
            return self.track_summary(&best).await;
        }

        let queues = self
            .client
            .queues()
            .await
            .map_err(|e| op_failed(e, AppError::CurrentTrack))?;
        let newest = queues.first().ok_or(AppError::CurrentTrack)?;
        let queue = self
            .client
            .queue(&newest.id)
            .await
            .map_err(|e| op_failed(e, AppError::CurrentTrack))?;
        let pointer = queue.current_track().ok_or(AppError::CurrentTrack)?;
        let track = self.fetch_track(&pointer.full_id()).await?;
        self.track_summary(&track).await
    }

    pub async fn artist_info(&self, artist_id: u64) -> Result<ArtistSummary> {
        let artists = self
            .client
            .artists(artist_id)
            .await
            .map_err(|e| op_failed(e, AppError::ArtistInfo))?;
        let artist = artists.first().ok_or(AppError::ArtistInfo)?;

        let tracks = self
            .client
            .artist_tracks(artist_id)
            .await
            .map_err(|e| op_failed(e, AppError::ArtistInfo))?;
        let albums = self
            .client
            .artist_direct_albums(artist_id)
            .await
            .map_err(|e| op_failed(e, AppError::ArtistInfo))?;

        ArtistSummary::from_parts(artist, &albums, &tracks).ok_or(AppError::ArtistInfo)
    }

    pub async fn like_track(&self, track_id: u64) -> Result<LikeResponse> {
        let message = self
            .client
            .like_track(track_id)
            .await
            .map_err(|e| op_failed(e, AppError::Like))?;
        Ok(LikeResponse { message })
    }

    pub async fn unlike_track(&self, track_id: u64) -> Result<LikeResponse> {
        let message = self
            .client
            .unlike_track(track_id)
            .await
            .map_err(|e| op_failed(e, AppError::Unlike))?;
        Ok(LikeResponse { message })
    }

    /// Resolves a composite id into a full track object.
    async fn fetch_track(&self, track_id: &str) -> Result<Track> {
        let mut tracks = self
            .client
            .tracks(&[track_id.to_string()])
            .await
            .map_err(|e| op_failed(e, AppError::TrackInfo))?;
        if tracks.is_empty() {
            return Err(AppError::TrackInfo);
        }
        Ok(tracks.swap_remove(0))
    }

    /// Fetch-and-shape for a single track: resolves the download link, then
    /// projects everything into the response shape.
    async fn track_summary(&self, track: &Track) -> Result<TrackSummary> {
        let download_link = self.download_link(track).await?;
        TrackSummary::from_track(track, download_link).ok_or(AppError::TrackInfo)
    }

    async fn download_link(&self, track: &Track) -> Result<String> {
        let infos = self
            .client
            .download_info(&track.track_id())
            .await
            .map_err(|e| op_failed(e, AppError::DownloadLink))?;
        let first = infos.first().ok_or(AppError::DownloadLink)?;
        self.client
            .direct_link(&first.download_info_url)
            .await
            .map_err(|e| op_failed(e, AppError::DownloadLink))
    }
}

/// Collapses whatever went wrong upstream into the operation's fixed error,
/// keeping the cause in the log only.
fn op_failed(cause: AppError, operation: AppError) -> AppError {
    warn!("{operation}: {cause}");
    operation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_skip_then_take() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(window(items.clone(), 2, 3), vec![2, 3, 4]);
        assert_eq!(window(items.clone(), 0, 25).len(), 10);
        assert_eq!(window(items.clone(), 9, 5), vec![9]);
        assert!(window(items, 30, 25).is_empty());
    }

    #[test]
    fn window_yields_min_of_remaining_and_count() {
        // For total T, skip S, count C: expect min(max(T - S, 0), C) items.
        for (total, skip, count) in [(10usize, 30usize, 25usize), (10, 0, 25), (10, 5, 25), (100, 90, 25)] {
            let items: Vec<usize> = (0..total).collect();
            let expected = total.saturating_sub(skip).min(count);
            assert_eq!(window(items, skip, count).len(), expected);
        }
    }

    #[test]
    fn window_preserves_order() {
        let items = vec!["a", "b", "c", "d"];
        assert_eq!(window(items, 1, 2), vec!["b", "c"]);
    }
}
