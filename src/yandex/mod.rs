pub mod client;
pub mod models;

pub use client::YandexClient;
pub use models::{Album, Artist, Track, TrackShort};
