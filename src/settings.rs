/// Settings store adapter over a synchronized key-value backend.
///
/// Every read fails open: when the backend errors the flag is reported as
/// enabled. Writes never surface errors to the caller; failures are logged.

use crate::error::StorageError;
use crate::storage::{flag_enabled, SiteTable, StoredSettings, ENABLED_KEY, SITE_ENABLED_KEY};
use serde_json::Value;

const LOG_PREFIX: &str = "[MiddleClick Everywhere][storage]";

/// Raw key-value access. `Ok(None)` means the key was never written.
#[allow(async_fn_in_trait)]
pub trait StorageBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

pub struct SettingsStore<B> {
    backend: B,
}

impl<B: StorageBackend> SettingsStore<B> {
    pub fn new(backend: B) -> Self {
        SettingsStore { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn get_global_enabled(&self) -> bool {
        // Only a stored `false` disables; `null`, `0` and other non-bool values count as enabled
        match self.backend.get(ENABLED_KEY).await {
            Ok(value) => flag_enabled(value.as_ref()),
            Err(err) => {
                log::error!("{} getGlobalEnabled error: {}", LOG_PREFIX, err);
                true
            }
        }
    }

    pub async fn set_global_enabled(&self, enabled: bool) {
        if let Err(err) = self.backend.set(ENABLED_KEY, Value::Bool(enabled)).await {
            log::error!("{} setGlobalEnabled error: {}", LOG_PREFIX, err);
        }
    }

    pub async fn get_site_enabled(&self, site_id: &str) -> bool {
        match self.backend.get(SITE_ENABLED_KEY).await {
            Ok(value) => SiteTable::from_stored(value).is_enabled(site_id),
            Err(err) => {
                log::error!("{} getSiteEnabled({}) error: {}", LOG_PREFIX, site_id, err);
                true
            }
        }
    }

    /// Read-modify-write of the site table. Not atomic: a concurrent writer
    /// between the read and the write loses its update.
    pub async fn set_site_enabled(&self, site_id: &str, enabled: bool) {
        let mut table = match self.backend.get(SITE_ENABLED_KEY).await {
            Ok(value) => SiteTable::from_stored(value),
            Err(err) => {
                log::error!("{} setSiteEnabled({}) error: {}", LOG_PREFIX, site_id, err);
                return;
            }
        };

        table.set(site_id, enabled);

        if let Err(err) = self.backend.set(SITE_ENABLED_KEY, table.into_value()).await {
            log::error!("{} setSiteEnabled({}) error: {}", LOG_PREFIX, site_id, err);
        }
    }

    /// Snapshot of the whole record, with the same fail-open defaults
    pub async fn load(&self) -> StoredSettings {
        let enabled = self.get_global_enabled().await;
        let site_enabled = match self.backend.get(SITE_ENABLED_KEY).await {
            Ok(value) => SiteTable::from_stored(value),
            Err(err) => {
                log::error!("{} load error: {}", LOG_PREFIX, err);
                SiteTable::new()
            }
        };

        StoredSettings {
            enabled,
            site_enabled,
        }
    }
}
