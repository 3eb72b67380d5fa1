// File: livewatch-common/src/models/notification.rs

/// A resolved destination channel. Produced once by the sink and reused
/// for every notification afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub id: u64,
    pub name: Option<String>,
}

impl ChannelHandle {
    pub fn new(id: u64, name: Option<String>) -> Self {
        Self { id, name }
    }

    /// `#name` when known, otherwise the raw id.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("#{name}"),
            None => self.id.to_string(),
        }
    }
}
