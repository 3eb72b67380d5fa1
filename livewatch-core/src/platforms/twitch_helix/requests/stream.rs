// ========================================================
// File: livewatch-core/src/platforms/twitch_helix/requests/stream.rs
// ========================================================
use serde::Deserialize;

use livewatch_common::models::{PresenceInfo, TrackedIdentity};

pub const TWITCH_CHANNEL_BASE_URL: &str = "https://twitch.tv";

pub const DEFAULT_TITLE: &str = "Live";
pub const DEFAULT_CATEGORY: &str = "Unknown";

/// Response from "Get Streams" endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamsResponse {
    #[serde(default)]
    pub data: Vec<StreamData>,
}

/// Single stream data record. Only the fields we render are kept; every one
/// of them may be missing or empty.
#[derive(Debug, Default, Deserialize)]
pub struct StreamData {
    #[serde(default)]
    pub user_login: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// The channel page for a login. Stable whether or not the channel is live.
pub fn canonical_url(identity: &TrackedIdentity) -> String {
    format!("{}/{}", TWITCH_CHANNEL_BASE_URL, identity.as_str())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl StreamData {
    pub fn into_presence(self, identity: &TrackedIdentity) -> PresenceInfo {
        PresenceInfo {
            display_name: non_empty(self.user_name).unwrap_or_else(|| identity.to_string()),
            title: non_empty(self.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            category: non_empty(self.game_name).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            url: canonical_url(identity),
        }
    }
}

impl StreamsResponse {
    /// First stream entry mapped to presence, or `None` when offline.
    pub fn into_presence(self, identity: &TrackedIdentity) -> Option<PresenceInfo> {
        self.data.into_iter().next().map(|s| s.into_presence(identity))
    }
}
