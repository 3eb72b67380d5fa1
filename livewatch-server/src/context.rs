//! livewatch-server/src/context.rs
//!
//! Owns everything the running bot needs: the Discord connection, the
//! optional Twitch poller, and the signals that start and stop it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use livewatch_common::traits::{NotificationSink, PresenceSource};
use livewatch_core::Error;
use livewatch_core::auth::{ClientCredentialsGrant, CredentialManager};
use livewatch_core::http::{build_http_client, DEFAULT_HTTP_TIMEOUT};
use livewatch_core::lifecycle::{ReadyGate, Shutdown};
use livewatch_core::platforms::twitch_helix::TwitchStatusClient;
use livewatch_core::tasks::{spawn_live_poller, LivePoller, PollerConfig};
use livewatch_core::tracker::TransitionTracker;

use crate::config::{AppConfig, TwitchConfig};
use crate::discord::DiscordNotifier;

pub struct ServerContext {
    pub config: AppConfig,
    pub ready: ReadyGate,
    pub shutdown: Shutdown,
    pub discord: Arc<DiscordNotifier>,
    /// Built only when Twitch credentials are configured.
    poller: Option<LivePoller>,
}

impl ServerContext {
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let ready = ReadyGate::new();
        let shutdown = Shutdown::new();
        let discord = Arc::new(DiscordNotifier::new(config.discord_token.clone(), ready.clone()));

        let poller = match &config.twitch {
            Some(twitch) => {
                if config.streamers.is_empty() {
                    warn!("Twitch is configured but no streamers are listed; polling will find nothing.");
                }
                let source = build_status_client(twitch)?;
                let mut poller_config = PollerConfig::new(config.channel_id, config.streamers.clone());
                poller_config.interval = config.poll_interval;
                poller_config.template = config.template.clone();
                let sink: Arc<dyn NotificationSink> = discord.clone();
                Some(LivePoller::new(source, sink, poller_config))
            }
            None => {
                warn!("TWITCH_CLIENT_ID / TWITCH_CLIENT_SECRET not set; Twitch polling is disabled.");
                None
            }
        };

        Ok(Self {
            config,
            ready,
            shutdown,
            discord,
            poller,
        })
    }

    /// Connects to Discord, starts polling, and blocks until `stop` resolves.
    /// Then stops the poller (letting a running tick finish) and closes the
    /// gateway session.
    pub async fn run<F>(mut self, stop: F) -> Result<(), Error>
    where
        F: std::future::Future<Output = ()>,
    {
        info!("Connecting to Discord; notifications go to channel {}.", self.config.channel_id);
        self.discord.connect().await?;

        let poller_handle: Option<JoinHandle<TransitionTracker>> = self
            .poller
            .take()
            .map(|p| spawn_live_poller(p, self.ready.clone(), self.shutdown.clone()));

        stop.await;
        info!("Shutdown requested.");
        self.shutdown.trigger();

        if let Some(handle) = poller_handle {
            match handle.await {
                Ok(tracker) => info!("Poller finished with {} streamer(s) live.", tracker.live_count()),
                Err(e) => error!("Poller task failed: {e}"),
            }
        }

        self.discord.disconnect().await;
        Ok(())
    }
}

fn build_status_client(twitch: &TwitchConfig) -> Result<Arc<dyn PresenceSource>, Error> {
    let http = build_http_client(DEFAULT_HTTP_TIMEOUT)?;

    let mut grant = ClientCredentialsGrant::new(http.clone(), &twitch.client_id, &twitch.client_secret);
    if let Some(url) = &twitch.auth_url {
        grant = grant.with_token_url(url.clone());
    }
    let credentials = Arc::new(CredentialManager::new(Arc::new(grant)));

    let mut client = TwitchStatusClient::new(http, &twitch.client_id, credentials);
    if let Some(url) = &twitch.helix_url {
        client = client.with_base_url(url.clone());
    }
    Ok(Arc::new(client))
}
