/// Persisted settings record kept in chrome.storage.sync
///
/// Stored structure:
///   { "enabled": true, "siteEnabled": { "youtube": true, ... } }
///
/// Both fields are optional; anything missing means "enabled".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Storage key of the global switch
pub const ENABLED_KEY: &str = "enabled";

/// Storage key of the per-site table
pub const SITE_ENABLED_KEY: &str = "siteEnabled";

/// A stored flag is on unless it is literally `false`
pub fn flag_enabled(value: Option<&Value>) -> bool {
    !matches!(value, Some(Value::Bool(false)))
}

/// Root storage structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub site_enabled: SiteTable,
}

fn default_enabled() -> bool {
    true
}

impl StoredSettings {
    pub fn new() -> Self {
        StoredSettings {
            enabled: true,
            site_enabled: SiteTable::new(),
        }
    }

    pub fn is_site_enabled(&self, site_id: &str) -> bool {
        self.site_enabled.is_enabled(site_id)
    }
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// The `siteEnabled` map. Values are kept as raw JSON so that entries written
/// by other versions survive a read-modify-write untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteTable(Map<String, Value>);

impl SiteTable {
    pub fn new() -> Self {
        SiteTable(Map::new())
    }

    /// Build from whatever was stored; a non-object value counts as empty
    pub fn from_stored(value: Option<Value>) -> Self {
        match value {
            Some(Value::Object(map)) => SiteTable(map),
            _ => SiteTable::new(),
        }
    }

    pub fn is_enabled(&self, site_id: &str) -> bool {
        flag_enabled(self.0.get(site_id))
    }

    pub fn set(&mut self, site_id: &str, enabled: bool) {
        self.0.insert(site_id.to_string(), Value::Bool(enabled));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
