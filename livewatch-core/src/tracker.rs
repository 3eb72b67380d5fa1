//! Offline→live edge detection per tracked identity.
//!
//! Each identity is either Offline or Live; anything never observed counts
//! as Offline. Only the Offline→Live edge produces an event.

use std::collections::HashMap;

use livewatch_common::models::TrackedIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    Unchanged,
    BecameLive,
}

#[derive(Debug, Default)]
pub struct TransitionTracker {
    live: HashMap<TrackedIdentity, bool>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest outcome for `identity` and reports whether it is a
    /// new offline→live transition.
    pub fn observe(&mut self, identity: &TrackedIdentity, is_live: bool) -> TransitionEvent {
        let was_live = self.live.insert(identity.clone(), is_live).unwrap_or(false);
        if is_live && !was_live {
            TransitionEvent::BecameLive
        } else {
            TransitionEvent::Unchanged
        }
    }

    pub fn is_live(&self, identity: &TrackedIdentity) -> bool {
        self.live.get(identity).copied().unwrap_or(false)
    }

    pub fn live_count(&self) -> usize {
        self.live.values().filter(|live| **live).count()
    }
}
