use serde::{Deserialize, Serialize};

/// Discriminator for incremental assistant text.
pub const TYPE_CHUNK: &str = "chunk";
/// Discriminator for the thread identifier record.
pub const TYPE_THREAD_ID: &str = "thread_id";
/// Discriminator for a far-end error record.
pub const TYPE_ERROR: &str = "error";

/// One `{type, content}` record carried by a single NDJSON line.
///
/// `type` stays a raw string so unknown discriminators deserialize cleanly and
/// can be dropped without counting as malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            content: content.into(),
        }
    }

    /// Map the envelope to a stream event, or `None` for unknown discriminators.
    pub fn into_event(self) -> Option<StreamEvent> {
        Some(match self.kind.as_str() {
            TYPE_CHUNK => StreamEvent::Chunk(self.content),
            TYPE_THREAD_ID => StreamEvent::ThreadId(self.content),
            TYPE_ERROR => StreamEvent::Error(self.content),
            _ => return None,
        })
    }
}

/// Consumer-facing event, one variant per callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Chunk(String),
    ThreadId(String),
    Error(String),
    Complete,
}

impl StreamEvent {
    /// Convenience accessor for `Chunk` contents.
    pub fn as_chunk(&self) -> Option<&str> {
        match self {
            Self::Chunk(text) => Some(text.as_str()),
            _ => None,
        }
    }
}
