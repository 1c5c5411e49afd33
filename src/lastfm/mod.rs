pub mod client;
pub mod models;

pub use client::LastfmClient;
pub use models::RecentTrack;
