use serde::{Deserialize, Serialize};

pub type SourceId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub enabled: bool,
}

/// One concrete URL able to serve a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: SourceId,
    pub channel_id: String,
    pub display_name: String,
    pub raw_header: String,
    pub url: String,
    pub active: bool,
}

/// A header/URL pair as read from a playlist document.
///
/// `channel_id` already carries the display-name fallback applied by the parser,
/// so it is only empty when the header had neither a tag nor a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Name of the input the entry came from; empty for unnamed text.
    pub document: String,
    pub line: usize,
    pub channel_id: String,
    pub display_name: String,
    pub raw_header: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct NewSource {
    pub channel_id: String,
    pub url: String,
    pub display_name: String,
    pub raw_header: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Inserted(SourceId),
    Refreshed(SourceId),
}

/// A channel together with its alternatives, ordered by source id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelView {
    pub channel: Channel,
    pub sources: Vec<Source>,
}

impl ChannelView {
    pub fn active_source(&self) -> Option<&Source> {
        self.sources.iter().find(|s| s.active)
    }
}
