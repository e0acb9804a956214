//! Settings access for the engine.
//!
//! The host owns the real configuration channel; the engine only reads
//! string-keyed values through [`ConfigStore`]. [`JsonSettings`] adapts the
//! JSON object editors push over their settings channels.

use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::debug;

/// Setting names as the host configuration schema spells them.
pub mod keys {
    pub const INTERNAL_HASH_LENGTH: &str = "internalHashLength";
    pub const INFO_MESSAGE_FORMAT: &str = "infoMessageFormat";
    pub const COMMIT_URL: &str = "commitUrl";
}

pub const DEFAULT_INTERNAL_HASH_LENGTH: usize = 7;
pub const DEFAULT_INFO_MESSAGE_FORMAT: &str = "${commit.summary}";

/// Read side of the host configuration.
///
/// `get` returns whatever the host has configured under `key`; the typed
/// accessors apply the engine defaults when a value is absent or has the
/// wrong shape.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    /// Truncation length for `${hash.short}`.
    fn internal_hash_length(&self) -> usize {
        self.get(keys::INTERNAL_HASH_LENGTH)
            .and_then(|value| value.as_u64())
            .map(|length| length as usize)
            .unwrap_or(DEFAULT_INTERNAL_HASH_LENGTH)
    }

    /// Template for the informational commit message.
    fn info_message_format(&self) -> String {
        self.get(keys::INFO_MESSAGE_FORMAT)
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_INFO_MESSAGE_FORMAT.to_string())
    }

    /// Template for the commit web URL. There is no usable default; an
    /// unset or empty value means the feature is unconfigured.
    fn commit_url(&self) -> Option<String> {
        self.get(keys::COMMIT_URL)
            .and_then(|value| value.as_str().map(str::to_string))
            .filter(|template| !template.is_empty())
    }
}

/// Settings snapshot deserialized from the JSON object a host pushes.
pub struct JsonSettings {
    values: Map<String, Value>,
}

impl JsonSettings {
    pub fn new(settings: Value) -> Self {
        let values = match settings {
            Value::Object(map) => map,
            other => {
                debug!(?other, "settings payload is not a JSON object");
                Map::new()
            }
        };
        JsonSettings { values }
    }
}

impl FromStr for JsonSettings {
    type Err = serde_json::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(raw).map(JsonSettings::new)
    }
}

impl ConfigStore for JsonSettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}
