pub mod aggregator;
pub mod summary;

pub use aggregator::Info;
pub use summary::{AlbumSummary, ArtistSummary, FavouriteTracks, LikeResponse, TrackSummary};
