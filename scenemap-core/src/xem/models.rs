//! XEM payloads.
//!
//! XEM is loose about types (ids arrive as strings or numbers, sub-objects
//! come and go), so responses are decoded into `serde_json::Value` first and
//! interpreted entry by entry. A bad entry is skipped, not fatal.

use std::collections::HashSet;

use scenemap_model::{SceneNumbers, SeasonEpisode, SeriesId};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

impl Envelope {
    fn is_success(&self) -> bool {
        self.result.as_deref() == Some(SUCCESS)
    }
}

/// Result of the `havemap` probe: every series XEM knows for one origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HaveMap {
    series: HashSet<i64>,
    rejected: Option<String>,
}

impl HaveMap {
    pub fn from_ids<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        Self {
            series: ids.into_iter().collect(),
            rejected: None,
        }
    }

    pub(crate) fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        let rejected = match envelope.result.as_deref() {
            Some(result) if result != SUCCESS => Some(
                envelope
                    .message
                    .clone()
                    .unwrap_or_else(|| result.to_string()),
            ),
            _ => None,
        };

        let Value::Array(ids) = envelope.data else {
            return Err(serde::de::Error::custom(
                "havemap `data` is not an array",
            ));
        };

        Ok(Self {
            series: ids.iter().filter_map(as_i64).collect(),
            rejected,
        })
    }

    pub fn contains(&self, series: SeriesId) -> bool {
        self.series.contains(&series.value())
    }

    pub(crate) fn len(&self) -> usize {
        self.series.len()
    }

    /// Message of a probe XEM answered with a non-success result.
    pub(crate) fn rejection(&self) -> Option<&str> {
        self.rejected.as_deref()
    }
}

/// Full origin-to-scene table for one series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingTable {
    pub result: Option<String>,
    pub message: Option<String>,
    entries: Vec<Value>,
}

impl MappingTable {
    pub fn from_entries(entries: Vec<Value>) -> Self {
        Self {
            result: Some(SUCCESS.to_string()),
            message: None,
            entries,
        }
    }

    /// A table XEM answered with a non-success result.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: Some("failure".to_string()),
            message: Some(message.into()),
            entries: Vec::new(),
        }
    }

    pub(crate) fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        let success = envelope.is_success();
        let entries = match envelope.data {
            Value::Array(entries) => entries,
            _ if !success => Vec::new(),
            _ => {
                return Err(serde::de::Error::custom(
                    "mapping `data` is not an array",
                ));
            }
        };

        Ok(Self {
            result: envelope.result,
            message: envelope.message,
            entries,
        })
    }

    pub fn is_success(&self) -> bool {
        self.result.as_deref() == Some(SUCCESS)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries readable for `origin`; unreadable ones are dropped.
    pub fn mappings<'a>(
        &'a self,
        origin: &'a str,
    ) -> impl Iterator<Item = XemMapping> + 'a {
        self.entries.iter().filter_map(move |entry| {
            let mapping = XemMapping::from_entry(entry, origin);
            if mapping.is_none() {
                debug!(origin, %entry, "Ignoring unreadable XEM entry");
            }
            mapping
        })
    }
}

/// One row of the mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XemMapping {
    pub origin: SeasonEpisode,
    pub scene: Option<SceneNumbers>,
    /// Second scene episode for doubled episodes.
    pub scene_2: Option<SceneNumbers>,
}

impl XemMapping {
    fn from_entry(entry: &Value, origin: &str) -> Option<Self> {
        let native = entry.get(origin)?;
        Some(Self {
            origin: SeasonEpisode::new(
                field_u32(native, "season")?,
                field_u32(native, "episode")?,
            ),
            scene: entry.get("scene").and_then(scene_numbers),
            scene_2: entry.get("scene_2").and_then(scene_numbers),
        })
    }

    /// Values to store: `scene_2` wins over `scene` when both are present.
    pub fn effective_scene(&self) -> Option<SceneNumbers> {
        self.scene_2.or(self.scene)
    }
}

fn scene_numbers(value: &Value) -> Option<SceneNumbers> {
    Some(SceneNumbers {
        season: field_u32(value, "season")?,
        episode: field_u32(value, "episode")?,
        absolute: field_u32(value, "absolute").unwrap_or(0),
    })
}

fn field_u32(value: &Value, key: &str) -> Option<u32> {
    value
        .get(key)
        .and_then(as_i64)
        .and_then(|n| u32::try_from(n).ok())
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
