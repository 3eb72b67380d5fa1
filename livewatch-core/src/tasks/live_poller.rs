use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::lifecycle::{ReadyGate, Shutdown};
use crate::template::MessageTemplate;
use crate::tracker::{TransitionEvent, TransitionTracker};
use livewatch_common::models::{ChannelHandle, TrackedIdentity};
use livewatch_common::traits::{NotificationSink, PresenceSource};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Destination channel id, resolved through the sink on first use.
    pub channel_id: u64,
    /// Checked in this order on every tick.
    pub identities: Vec<TrackedIdentity>,
    pub interval: Duration,
    pub template: MessageTemplate,
}

impl PollerConfig {
    pub fn new(channel_id: u64, identities: Vec<TrackedIdentity>) -> Self {
        Self {
            channel_id,
            identities,
            interval: DEFAULT_POLL_INTERVAL,
            template: MessageTemplate::default(),
        }
    }
}

/// What one pass over the tracked identities did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub checked: usize,
    pub failed: usize,
    pub notified: usize,
    /// The destination channel could not be resolved, nothing was checked.
    pub skipped: bool,
}

/// Polls presence for every tracked identity and announces new live streams.
pub struct LivePoller {
    source: Arc<dyn PresenceSource>,
    sink: Arc<dyn NotificationSink>,
    tracker: TransitionTracker,
    config: PollerConfig,
    channel: Option<ChannelHandle>,
}

impl LivePoller {
    pub fn new(
        source: Arc<dyn PresenceSource>,
        sink: Arc<dyn NotificationSink>,
        config: PollerConfig,
    ) -> Self {
        Self {
            source,
            sink,
            tracker: TransitionTracker::new(),
            config,
            channel: None,
        }
    }

    pub fn tracker(&self) -> &TransitionTracker {
        &self.tracker
    }

    /// Waits for `ready`, then ticks every `interval` until `shutdown`.
    ///
    /// A stop request never interrupts a tick that has already started.
    pub async fn run(mut self, ready: ReadyGate, shutdown: Shutdown) -> TransitionTracker {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!("Live poller stopped before the notification channel became ready.");
                return self.tracker;
            }
            _ = ready.wait() => {}
        }

        info!(
            "Live poller started: {} identities every {}s.",
            self.config.identities.len(),
            self.config.interval.as_secs_f64()
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let summary = self.tick().await;
            debug!(
                "Tick finished: checked={}, failed={}, notified={}, skipped={}",
                summary.checked, summary.failed, summary.notified, summary.skipped
            );
        }

        info!("Live poller stopped.");
        self.tracker
    }

    /// One full pass over the configured identities.
    pub async fn tick(&mut self) -> TickSummary {
        let mut summary = TickSummary::default();

        let Some(channel) = self.ensure_channel().await else {
            summary.skipped = true;
            return summary;
        };

        for identity in &self.config.identities {
            summary.checked += 1;

            let presence = match self.source.fetch_presence(identity).await {
                Ok(p) => p,
                Err(e) => {
                    // Leave the recorded state alone; a failed check is not "offline".
                    warn!("Twitch check failed for {}: {}", identity, e);
                    summary.failed += 1;
                    continue;
                }
            };

            let event = self.tracker.observe(identity, presence.is_some());
            let (TransitionEvent::BecameLive, Some(info)) = (event, presence) else {
                continue;
            };

            let text = self.config.template.render(&info);
            match self.sink.send(&channel, &text).await {
                Ok(()) => {
                    info!("{} went live; notified {}", identity, channel.label());
                    summary.notified += 1;
                }
                Err(e) => {
                    // The transition stays recorded; this one is not retried.
                    warn!("Failed to announce {} in {}: {}", identity, channel.label(), e);
                }
            }
        }

        summary
    }

    async fn ensure_channel(&mut self) -> Option<ChannelHandle> {
        if self.channel.is_none() {
            match self.sink.resolve_channel(self.config.channel_id).await {
                Ok(handle) => {
                    info!("Resolved notification channel {}", handle.label());
                    self.channel = Some(handle);
                }
                Err(e) => {
                    warn!(
                        "Could not resolve channel {}: {}; skipping this tick.",
                        self.config.channel_id, e
                    );
                }
            }
        }
        self.channel.clone()
    }
}

/// Spawns the poller as a background task. The task ends once `shutdown`
/// fires and any in-progress tick has finished.
pub fn spawn_live_poller(
    poller: LivePoller,
    ready: ReadyGate,
    shutdown: Shutdown,
) -> JoinHandle<TransitionTracker> {
    tokio::spawn(poller.run(ready, shutdown))
}
