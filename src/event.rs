//! Invocation payload types
//!
//! An invocation arrives either with no payload (poll-based deployments) or
//! with a list of object-created records naming the storage keys that
//! triggered it. The one policy decision here is the self-trigger guard:
//! writing the merged output into a watched bucket re-triggers the function,
//! so events that concern only the output prefix are dropped.

use serde::Deserialize;

use crate::error::{MergeError, Result, event_parse_failed};

/// One object-created notification.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    /// Storage key of the object that triggered the invocation.
    pub key: String,
}

/// The payload of one event-triggered invocation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct InvocationEvent {
    #[serde(default)]
    pub records: Vec<EventRecord>,
}

impl InvocationEvent {
    /// Parse an event payload from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| event_parse_failed(e.to_string()))
    }

    /// Read and parse an event payload from a file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| MergeError::EventReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&bytes)
    }

    /// True when the event carries records and every one of them lies under
    /// the output prefix. Such an invocation is a no-op: it was triggered by
    /// our own write.
    pub fn is_output_only(&self, output_prefix: &str) -> bool {
        !self.records.is_empty()
            && self
                .records
                .iter()
                .all(|record| record.key.starts_with(output_prefix))
    }
}
