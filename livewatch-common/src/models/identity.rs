// File: livewatch-common/src/models/identity.rs

use std::fmt;

/// The login name of a tracked Twitch account. Used both as the
/// `user_login` query value and as the key of the live-state map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackedIdentity(String);

impl TrackedIdentity {
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackedIdentity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TrackedIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}
