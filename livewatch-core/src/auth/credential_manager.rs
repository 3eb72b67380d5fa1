//! Caches the app access token used for Helix calls.
//!
//! The cached credential sits behind an async mutex that stays locked for
//! the whole grant exchange. Callers that show up while a refresh is in
//! flight queue on the lock and then find the fresh token, so there is
//! never more than one grant request at a time.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::Error;
use crate::utils::time::{Clock, SystemClock};
use livewatch_common::models::Credential;
use livewatch_common::traits::TokenGrant;

/// A cached token is not handed out during its last minute.
pub const TOKEN_SAFETY_MARGIN_SECS: i64 = 60;

pub struct CredentialManager {
    grant: Arc<dyn TokenGrant>,
    clock: Arc<dyn Clock>,
    margin: Duration,
    cached: Mutex<Option<Credential>>,
}

impl CredentialManager {
    pub fn new(grant: Arc<dyn TokenGrant>) -> Self {
        Self {
            grant,
            clock: Arc::new(SystemClock),
            margin: Duration::seconds(TOKEN_SAFETY_MARGIN_SECS),
            cached: Mutex::new(None),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns a bearer token that is valid for at least the safety margin,
    /// running the grant exchange when the cache is empty or stale.
    pub async fn get_token(&self) -> Result<String, Error> {
        let mut guard = self.cached.lock().await;

        if let Some(cred) = guard.as_ref() {
            if cred.is_usable_at(self.clock.now(), self.margin) {
                return Ok(cred.access_token.clone());
            }
        }

        // Stale or missing; never leave a stale token behind a failed refresh.
        *guard = None;

        let granted = self.grant.request_token().await?;
        let expires_in = granted.expires_in;
        let cred = Credential::from_grant(granted, self.clock.now());
        let token = cred.access_token.clone();
        *guard = Some(cred);

        info!("Fetched Twitch app token (expires in {}s).", expires_in);
        Ok(token)
    }

    /// Drops the cached token so the next call performs a fresh grant.
    pub async fn invalidate(&self) {
        let mut guard = self.cached.lock().await;
        if guard.take().is_some() {
            warn!("Discarded cached Twitch app token; it will be re-fetched on next use.");
        }
    }

    /// Expiry of the cached token, if any.
    pub async fn cached_expiry(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.cached.lock().await.as_ref().map(|c| c.expires_at)
    }
}
