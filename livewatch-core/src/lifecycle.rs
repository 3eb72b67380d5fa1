//! Start and stop signals shared between the chat connection and the poller.
//!
//! Both are one-shot latches on a `watch` channel: once set they stay set,
//! and any number of clones can await them.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone)]
struct Latch {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Latch {
    fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    fn set(&self) {
        self.tx.send_replace(true);
    }

    fn is_set(&self) -> bool {
        *self.rx.borrow()
    }

    async fn wait(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as `self`, so this cannot see a closed channel.
        let _ = rx.wait_for(|set| *set).await;
    }
}

/// Opened once the notification side can deliver messages.
#[derive(Debug, Clone)]
pub struct ReadyGate {
    latch: Latch,
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadyGate {
    pub fn new() -> Self {
        Self { latch: Latch::new() }
    }

    pub fn open(&self) {
        self.latch.set();
    }

    pub fn is_open(&self) -> bool {
        self.latch.is_set()
    }

    pub async fn wait(&self) {
        self.latch.wait().await
    }
}

/// Stop request for background tasks.
#[derive(Debug, Clone)]
pub struct Shutdown {
    latch: Latch,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        Self { latch: Latch::new() }
    }

    pub fn trigger(&self) {
        self.latch.set();
    }

    pub fn is_triggered(&self) -> bool {
        self.latch.is_set()
    }

    pub async fn cancelled(&self) {
        self.latch.wait().await
    }
}
