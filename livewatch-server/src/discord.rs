use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_cache_inmemory::{InMemoryCache, ResourceType};
use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender,
    Shard,
    StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_http::client::ClientBuilder;
use twilight_model::gateway::payload::incoming::Ready as ReadyPayload;
use twilight_model::id::marker::ChannelMarker;
use twilight_model::id::Id;

use livewatch_common::models::ChannelHandle;
use livewatch_common::traits::NotificationSink;
use livewatch_core::Error;
use livewatch_core::lifecycle::{ReadyGate, Shutdown};

const SHARD_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Polling a shard after a close reconnects it. Stop on the close event once
/// `closing` has fired.
fn closed_for_good(event: &Event, closing: &Shutdown) -> bool {
    matches!(event, Event::GatewayClose(_)) && closing.is_triggered()
}

/// Drives one gateway shard: keeps the cache current and opens the ready
/// gate on READY. Runs until `closing` fires and the shard reports its close.
async fn shard_runner(
    mut shard: Shard,
    cache: Arc<InMemoryCache>,
    ready: ReadyGate,
    closing: Shutdown,
) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        match item {
            Ok(event) => {
                if closed_for_good(&event, &closing) {
                    info!("(ShardRunner) Shard {shard_id} closed.");
                    break;
                }
                cache.update(&event);

                match &event {
                    Event::Ready(ready_event) => {
                        let data: &ReadyPayload = ready_event.as_ref();
                        info!("Logged in as {} (ID={})", data.user.name, data.user.id);
                        ready.open();
                    }
                    Event::GatewayClose(frame) => {
                        debug!("Shard {shard_id} => gateway closed: {frame:?}");
                    }
                    _ => {
                        trace!("Shard {shard_id} => unhandled event: {:?}", event.kind());
                    }
                }
            }
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

fn channel_id(raw: u64) -> Result<Id<ChannelMarker>, Error> {
    Id::<ChannelMarker>::new_checked(raw)
        .ok_or_else(|| Error::Config(format!("Invalid channel ID: {raw}")))
}

/// Discord side of the bot: a gateway connection that keeps the session
/// alive and a REST client used to post notifications.
pub struct DiscordNotifier {
    token: String,
    http: Arc<HttpClient>,
    cache: Arc<InMemoryCache>,
    ready: ReadyGate,
    closing: Shutdown,
    shard_tasks: Mutex<Vec<JoinHandle<()>>>,
    shard_senders: Mutex<Vec<MessageSender>>,
}

impl DiscordNotifier {
    pub fn new(token: String, ready: ReadyGate) -> Self {
        let http = Arc::new(
            ClientBuilder::new()
                .token(token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );

        let cache = InMemoryCache::builder()
            .resource_types(ResourceType::GUILD | ResourceType::CHANNEL)
            .build();

        Self {
            token,
            http,
            cache: Arc::new(cache),
            ready,
            closing: Shutdown::new(),
            shard_tasks: Mutex::new(Vec::new()),
            shard_senders: Mutex::new(Vec::new()),
        }
    }

    /// Logs in and spawns one runner per recommended shard.
    pub async fn connect(&self) -> Result<(), Error> {
        if self.closing.is_triggered() {
            return Err(Error::Delivery("Discord session was already closed".into()));
        }

        let mut tasks = self.shard_tasks.lock().await;
        if !tasks.is_empty() {
            info!("(DiscordNotifier) Already connected => skipping");
            return Ok(());
        }

        // Posting messages needs no privileged intents.
        let config = Config::new(self.token.clone(), Intents::GUILDS);

        let shards = gateway::create_recommended(&self.http, config, |_, b| b.build())
            .await
            .map_err(|e| Error::Delivery(format!("create_recommended error: {e}")))?;

        let mut senders = self.shard_senders.lock().await;
        for shard in shards {
            senders.push(shard.sender());
            let cache = self.cache.clone();
            let ready = self.ready.clone();
            let closing = self.closing.clone();
            tasks.push(tokio::spawn(shard_runner(shard, cache, ready, closing)));
        }

        info!("(DiscordNotifier) Spawned {} shard(s).", tasks.len());
        Ok(())
    }

    /// Closes every shard and waits for the runners to finish.
    pub async fn disconnect(&self) {
        self.closing.trigger();
        for sender in self.shard_senders.lock().await.drain(..) {
            let _ = sender.close(CloseFrame::NORMAL);
        }

        let tasks: Vec<_> = self.shard_tasks.lock().await.drain(..).collect();
        for task in tasks {
            if tokio::time::timeout(SHARD_CLOSE_TIMEOUT, task).await.is_err() {
                warn!("(DiscordNotifier) Shard did not close within {:?}", SHARD_CLOSE_TIMEOUT);
            }
        }
        info!("(DiscordNotifier) Disconnected.");
    }
}

#[async_trait]
impl NotificationSink for DiscordNotifier {
    async fn resolve_channel(&self, raw_id: u64) -> Result<ChannelHandle, Error> {
        let id = channel_id(raw_id)?;

        if let Some(channel) = self.cache.channel(id) {
            return Ok(ChannelHandle::new(raw_id, channel.name.clone()));
        }

        debug!("Channel {raw_id} not cached; fetching it.");
        let channel = self.http
            .channel(id)
            .await
            .map_err(|e| Error::Delivery(format!("Error fetching channel {raw_id}: {e}")))?
            .model()
            .await
            .map_err(|e| Error::Delivery(format!("Error parsing channel {raw_id}: {e}")))?;

        Ok(ChannelHandle::new(raw_id, channel.name))
    }

    async fn send(&self, channel: &ChannelHandle, text: &str) -> Result<(), Error> {
        let id = channel_id(channel.id)?;
        self.http
            .create_message(id)
            .content(text)
            .await
            .map_err(|e| Error::Delivery(format!("Error sending Discord message: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_channel() {
        assert!(matches!(channel_id(0), Err(Error::Config(_))));
        assert_eq!(channel_id(42).unwrap().get(), 42);
    }

    #[test]
    fn runner_stops_on_close_only_after_disconnect() {
        let closing = Shutdown::new();
        let close = Event::GatewayClose(None);

        // a close we did not ask for is followed by a reconnect
        assert!(!closed_for_good(&close, &closing));

        closing.trigger();
        assert!(closed_for_good(&close, &closing));
        assert!(!closed_for_good(&Event::GatewayHeartbeatAck, &closing));
    }

    #[tokio::test]
    async fn connect_after_disconnect_is_refused() {
        let notifier = DiscordNotifier::new("token".into(), ReadyGate::new());
        notifier.disconnect().await;
        assert!(matches!(notifier.connect().await, Err(Error::Delivery(_))));
    }
}
