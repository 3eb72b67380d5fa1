// File: livewatch-common/src/models/credential.rs

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// What the auth endpoint hands back for a client-credentials grant.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantedToken {
    pub access_token: String,
    /// Lifetime in seconds. Twitch always sends it; a missing value means
    /// the token is treated as already stale.
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// A cached bearer token together with its absolute expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn from_grant(granted: GrantedToken, fetched_at: DateTime<Utc>) -> Self {
        Self {
            access_token: granted.access_token,
            expires_at: fetched_at + Duration::seconds(granted.expires_in.max(0)),
        }
    }

    /// Usable only while `now < expires_at - margin`.
    pub fn is_usable_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now < self.expires_at - margin
    }
}
