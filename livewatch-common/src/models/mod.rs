// File: livewatch-common/src/models/mod.rs

pub mod credential;
pub mod identity;
pub mod notification;
pub mod presence;

pub use credential::{Credential, GrantedToken};
pub use identity::TrackedIdentity;
pub use notification::ChannelHandle;
pub use presence::PresenceInfo;
