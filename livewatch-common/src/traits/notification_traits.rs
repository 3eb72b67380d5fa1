use async_trait::async_trait;

use crate::error::Error;
use crate::models::ChannelHandle;

/// Chat-side delivery of live notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Looks up the destination channel by id. Called once; the handle is reused.
    async fn resolve_channel(&self, channel_id: u64) -> Result<ChannelHandle, Error>;

    /// Posts `text` to `channel`. Failures surface as `Error::Delivery`.
    async fn send(&self, channel: &ChannelHandle, text: &str) -> Result<(), Error>;
}
