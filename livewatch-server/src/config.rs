//! Process configuration, read from the environment (after `.env` loading).

use std::time::Duration;

use livewatch_common::models::TrackedIdentity;
use livewatch_core::Error;
use livewatch_core::tasks::DEFAULT_POLL_INTERVAL;
use livewatch_core::template::MessageTemplate;

pub const ENV_DISCORD_TOKEN: &str = "DISCORD_TOKEN";
pub const ENV_DISCORD_CHANNEL_ID: &str = "DISCORD_CHANNEL_ID";
pub const ENV_TWITCH_CLIENT_ID: &str = "TWITCH_CLIENT_ID";
pub const ENV_TWITCH_CLIENT_SECRET: &str = "TWITCH_CLIENT_SECRET";
pub const ENV_TWITCH_STREAMERS: &str = "TWITCH_STREAMERS";
pub const ENV_POLL_SECONDS: &str = "POLL_SECONDS";
pub const ENV_MESSAGE_TEMPLATE: &str = "MESSAGE_TEMPLATE";
pub const ENV_TWITCH_AUTH_URL: &str = "TWITCH_AUTH_URL";
pub const ENV_TWITCH_HELIX_URL: &str = "TWITCH_HELIX_URL";

#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: Option<String>,
    pub helix_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_token: String,
    pub channel_id: u64,
    /// `None` when no Twitch app credentials are configured; polling is off.
    pub twitch: Option<TwitchConfig>,
    pub streamers: Vec<TrackedIdentity>,
    pub poll_interval: Duration,
    pub template: MessageTemplate,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let discord_token = get(ENV_DISCORD_TOKEN)
            .ok_or_else(|| Error::Config(format!("{ENV_DISCORD_TOKEN} is not set")))?;

        let channel_raw = get(ENV_DISCORD_CHANNEL_ID)
            .ok_or_else(|| Error::Config(format!("{ENV_DISCORD_CHANNEL_ID} is not set")))?;
        let channel_id = channel_raw
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| Error::Config(format!("{ENV_DISCORD_CHANNEL_ID} is not a valid channel id: {channel_raw}")))?;

        let twitch = match (get(ENV_TWITCH_CLIENT_ID), get(ENV_TWITCH_CLIENT_SECRET)) {
            (Some(client_id), Some(client_secret)) => Some(TwitchConfig {
                client_id,
                client_secret,
                auth_url: get(ENV_TWITCH_AUTH_URL),
                helix_url: get(ENV_TWITCH_HELIX_URL),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(Error::Config(format!(
                    "{ENV_TWITCH_CLIENT_ID} is set but {ENV_TWITCH_CLIENT_SECRET} is not"
                )));
            }
            (None, Some(_)) => {
                return Err(Error::Config(format!(
                    "{ENV_TWITCH_CLIENT_SECRET} is set but {ENV_TWITCH_CLIENT_ID} is not"
                )));
            }
        };

        let streamers = get(ENV_TWITCH_STREAMERS)
            .map(|raw| parse_streamers(&raw))
            .unwrap_or_default();

        let poll_interval = match get(ENV_POLL_SECONDS) {
            Some(raw) => parse_poll_seconds(&raw)?,
            None => DEFAULT_POLL_INTERVAL,
        };

        let template = get(ENV_MESSAGE_TEMPLATE)
            .map(|raw| MessageTemplate::from_escaped(&raw))
            .unwrap_or_default();

        Ok(Self {
            discord_token,
            channel_id,
            twitch,
            streamers,
            poll_interval,
            template,
        })
    }
}

/// Comma separated logins, in order. Blank entries are dropped and a
/// repeated login keeps its first position.
pub fn parse_streamers(raw: &str) -> Vec<TrackedIdentity> {
    let mut out: Vec<TrackedIdentity> = Vec::new();
    for login in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        let identity = TrackedIdentity::from(login);
        if !out.contains(&identity) {
            out.push(identity);
        }
    }
    out
}

pub fn parse_poll_seconds(raw: &str) -> Result<Duration, Error> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs >= 1 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::Config(format!(
            "{ENV_POLL_SECONDS} must be a whole number of seconds >= 1, got {raw:?}"
        ))),
    }
}
