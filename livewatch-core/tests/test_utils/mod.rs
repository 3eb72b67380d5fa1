// File: livewatch-core/tests/test_utils/mod.rs
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use livewatch_core::Error;
use livewatch_core::models::{ChannelHandle, GrantedToken, PresenceInfo, TrackedIdentity};
use livewatch_core::traits::{NotificationSink, PresenceSource, TokenGrant};
use livewatch_core::utils::time::Clock;

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Grant that hands out `tok-1`, `tok-2`, ... and counts exchanges.
pub struct CountingGrant {
    pub calls: AtomicUsize,
    pub expires_in: i64,
    pub delay: Duration,
    pub fail_with_status: Mutex<Option<u16>>,
}

impl CountingGrant {
    pub fn new(expires_in: i64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            expires_in,
            delay: Duration::ZERO,
            fail_with_status: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_next(&self, status: Option<u16>) {
        *self.fail_with_status.lock().unwrap() = status;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenGrant for CountingGrant {
    async fn request_token(&self) -> Result<GrantedToken, Error> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let fail = *self.fail_with_status.lock().unwrap();
        if let Some(status) = fail {
            return Err(Error::Auth { status, body: "denied".into() });
        }
        Ok(GrantedToken {
            access_token: format!("tok-{n}"),
            expires_in: self.expires_in,
            token_type: Some("bearer".into()),
        })
    }
}

/// What a scripted source answers for one identity on one call.
pub enum Scripted {
    Live,
    Offline,
    Fail,
    /// The status endpoint rejected the app token.
    AuthFail,
}

/// Presence source replaying a per-identity script. Once a script runs out
/// the identity reports offline.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    pub calls: Mutex<Vec<String>>,
    delay: Duration,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, login: &str, steps: Vec<Scripted>) -> Self {
        self.scripts.lock().unwrap().insert(login.to_string(), steps.into());
        self
    }

    /// Every lookup takes `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn presence_for(login: &str) -> PresenceInfo {
    PresenceInfo {
        display_name: login.to_uppercase(),
        title: format!("{login} title"),
        category: "Just Chatting".into(),
        url: format!("https://twitch.tv/{login}"),
    }
}

#[async_trait]
impl PresenceSource for ScriptedSource {
    async fn fetch_presence(&self, identity: &TrackedIdentity) -> Result<Option<PresenceInfo>, Error> {
        self.calls.lock().unwrap().push(identity.to_string());
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(identity.as_str())
            .and_then(|s| s.pop_front());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match step {
            Some(Scripted::Live) => Ok(Some(presence_for(identity.as_str()))),
            Some(Scripted::Fail) => Err(Error::Api { status: 503, body: "unavailable".into() }),
            Some(Scripted::AuthFail) => Err(Error::Auth { status: 401, body: "invalid token".into() }),
            Some(Scripted::Offline) | None => Ok(None),
        }
    }
}

/// Sink that records every message; can be told to fail sends or
/// channel resolution.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<(u64, String)>>,
    pub send_attempts: AtomicUsize,
    pub resolve_attempts: AtomicUsize,
    pub fail_sends: Mutex<bool>,
    pub fail_resolves: Mutex<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_sends() -> Self {
        let sink = Self::default();
        *sink.fail_sends.lock().unwrap() = true;
        sink
    }

    /// The first `n` resolutions fail.
    pub fn failing_resolves(n: usize) -> Self {
        let sink = Self::default();
        *sink.fail_resolves.lock().unwrap() = n;
        sink
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn resolve_channel(&self, channel_id: u64) -> Result<ChannelHandle, Error> {
        self.resolve_attempts.fetch_add(1, Ordering::SeqCst);
        let mut remaining = self.fail_resolves.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(Error::Delivery(format!("unknown channel {channel_id}")));
        }
        Ok(ChannelHandle::new(channel_id, Some("live-alerts".into())))
    }

    async fn send(&self, channel: &ChannelHandle, text: &str) -> Result<(), Error> {
        self.send_attempts.fetch_add(1, Ordering::SeqCst);
        if *self.fail_sends.lock().unwrap() {
            return Err(Error::Delivery("Missing Access".into()));
        }
        self.sent.lock().unwrap().push((channel.id, text.to_string()));
        Ok(())
    }
}
