// File: livewatch-common/src/models/presence.rs

/// Metadata for an identity that is live right now. A fetch that finds no
/// stream yields no `PresenceInfo` at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceInfo {
    pub display_name: String,
    pub title: String,
    pub category: String,
    pub url: String,
}
