// File: livewatch-core/src/template.rs

use livewatch_common::models::PresenceInfo;

pub const DEFAULT_MESSAGE_TEMPLATE: &str = "**{name}** is streaming!\n\
{title}\n\
They are streaming: **{game}**\n\
Link to the stream: {url}\n";

/// Notification text with `{name}`, `{title}`, `{game}` and `{url}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    raw: String,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_TEMPLATE)
    }
}

impl MessageTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Parses a template coming from a single-line source such as an
    /// environment variable, where a literal `\n` stands for a newline.
    pub fn from_escaped(raw: &str) -> Self {
        Self::new(raw.replace("\\n", "\n"))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn render(&self, info: &PresenceInfo) -> String {
        // Single pass so substituted values are never re-scanned for slots.
        let mut out = String::with_capacity(self.raw.len() + 64);
        let mut rest = self.raw.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open..];
            let slot = after.find('}').map(|close| &after[..=close]);
            let value = match slot {
                Some("{name}") => Some(info.display_name.as_str()),
                Some("{title}") => Some(info.title.as_str()),
                Some("{game}") => Some(info.category.as_str()),
                Some("{url}") => Some(info.url.as_str()),
                _ => None,
            };
            match (slot, value) {
                (Some(slot), Some(value)) => {
                    out.push_str(value);
                    rest = &after[slot.len()..];
                }
                _ => {
                    out.push('{');
                    rest = &after[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}
