// File: livewatch-core/src/platforms/twitch_helix/mod.rs

pub mod client;
pub mod requests;

pub use client::{TwitchStatusClient, HELIX_BASE_URL};
pub use requests::stream::canonical_url;
