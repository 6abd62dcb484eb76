//! Repository configuration adapters.
//!
//! gCTS stores a repository's configuration as a list of `{key, value}`
//! objects. Callers work with a map instead; keys are unique and the last
//! entry for a key wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known configuration keys
pub const VCS_TARGET_DIR: &str = "VCS_TARGET_DIR";
pub const CLIENT_VCS_AUTH_TOKEN: &str = "CLIENT_VCS_AUTH_TOKEN";

/// One configuration entry as the server stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub value: String,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The server occasionally sends numbers or booleans as values.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

pub type ConfigMap = BTreeMap<String, String>;

pub fn list_to_map(config: &[ConfigEntry]) -> ConfigMap {
    config
        .iter()
        .map(|entry| (entry.key.clone(), entry.value.clone()))
        .collect()
}

pub fn map_to_list(config: &ConfigMap) -> Vec<ConfigEntry> {
    config
        .iter()
        .map(|(key, value)| ConfigEntry::new(key, value))
        .collect()
}

/// Updates every entry for `key` in place or appends a new one.
pub fn set_configuration_key(config: &mut Vec<ConfigEntry>, key: &str, value: &str) {
    let mut found = false;
    for entry in config.iter_mut().filter(|entry| entry.key == key) {
        entry.value = value.to_string();
        found = true;
    }

    if !found {
        config.push(ConfigEntry::new(key, value));
    }
}

/// Reads a `config` list out of a repository JSON object.
///
/// A missing or null list reads as empty.
pub fn entries_from_value(value: Option<&Value>) -> serde_json::Result<Vec<ConfigEntry>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Vec::<ConfigEntry>::deserialize(value),
    }
}
