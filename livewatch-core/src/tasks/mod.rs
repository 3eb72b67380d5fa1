pub mod live_poller;

pub use live_poller::{spawn_live_poller, LivePoller, PollerConfig, TickSummary, DEFAULT_POLL_INTERVAL};
