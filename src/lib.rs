pub mod config;
pub mod error;
pub mod info;
pub mod lastfm;
pub mod server;
pub mod yandex;

pub use config::Config;
pub use error::{AppError, Result};
pub use info::{AlbumSummary, ArtistSummary, FavouriteTracks, Info, LikeResponse, TrackSummary};
pub use lastfm::LastfmClient;
pub use yandex::YandexClient;
