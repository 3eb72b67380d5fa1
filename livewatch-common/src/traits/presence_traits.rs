use async_trait::async_trait;

use crate::error::Error;
use crate::models::{PresenceInfo, TrackedIdentity};

#[async_trait]
pub trait PresenceSource: Send + Sync {
    /// `Ok(None)` means the identity is offline.
    async fn fetch_presence(&self, identity: &TrackedIdentity) -> Result<Option<PresenceInfo>, Error>;
}
