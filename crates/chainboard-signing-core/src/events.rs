//! Recovery of chain-assigned identifiers from a broadcast result.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{BroadcastResult, Event};

/// Event type and attribute key under which the chain reports an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSelector {
    pub event_type: &'static str,
    pub attribute_key: &'static str,
}

impl EventSelector {
    pub const fn new(event_type: &'static str, attribute_key: &'static str) -> Self {
        Self {
            event_type,
            attribute_key,
        }
    }

    pub fn extract(&self, result: &BroadcastResult) -> Option<String> {
        extract(result, self.event_type, self.attribute_key)
    }
}

/// Per-message log entry found in `raw_log` on older networks.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageLog {
    #[serde(default)]
    pub msg_index: Option<u32>,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

pub fn parse_raw_log(raw_log: &str) -> Result<Vec<MessageLog>, serde_json::Error> {
    serde_json::from_str(raw_log)
}

/// Structured events are searched first; only when the result carries none
/// is `raw_log` parsed. No match is `None`, not an error.
pub fn extract(result: &BroadcastResult, event_type: &str, attribute_key: &str) -> Option<String> {
    if !result.events.is_empty() {
        return find_attribute(&result.events, event_type, attribute_key);
    }

    let logs = match parse_raw_log(&result.raw_log) {
        Ok(logs) => logs,
        Err(e) => {
            debug!(tx_hash = %result.tx_hash, "raw log is not a JSON message log: {e}");
            return None;
        }
    };
    let events: Vec<Event> = logs.into_iter().flat_map(|log| log.events).collect();
    find_attribute(&events, event_type, attribute_key)
}

fn find_attribute(events: &[Event], event_type: &str, attribute_key: &str) -> Option<String> {
    events
        .iter()
        .filter(|event| event.kind == event_type)
        .flat_map(|event| event.attributes.iter())
        .find(|attribute| attribute.key == attribute_key)
        .map(|attribute| attribute.value.clone())
}
