/// Content script engine.
///
/// Checks the global switch, then walks the registry in order: for each site
/// that matches the current URL and is enabled in storage, attach its
/// listeners. Sites are processed one after another; a failing site is logged
/// and skipped.

use crate::dom::Page;
use crate::registry::Registry;
use crate::settings::{SettingsStore, StorageBackend};
use crate::site::{ListenerHost, SiteId};

const LOG_PREFIX: &str = "[MiddleClick Everywhere][engine]";

/// Returns the ids of the sites initialized by this call
pub async fn init_engine<B, P, H>(
    settings: &SettingsStore<B>,
    registry: &Registry<P>,
    url: &str,
    host: &H,
) -> Vec<SiteId>
where
    B: StorageBackend,
    P: Page,
    H: ListenerHost<P>,
{
    let mut initialized = Vec::new();

    let globally_enabled = settings.get_global_enabled().await;
    log::debug!("{} Global enabled state: {}", LOG_PREFIX, globally_enabled);

    if !globally_enabled {
        log::info!("{} Extension globally disabled, not initializing any sites.", LOG_PREFIX);
        return initialized;
    }

    for site in registry.sites() {
        let matches = site.matches(url);
        log::debug!("{} Checking site {:?} match: {}", LOG_PREFIX, site.id(), matches);
        if !matches {
            continue;
        }

        let site_enabled = settings.get_site_enabled(site.id()).await;
        log::debug!("{} Site {:?} enabled state: {}", LOG_PREFIX, site.id(), site_enabled);
        if !site_enabled {
            log::info!(
                "{} Site {:?} is disabled in user settings, skipping init.",
                LOG_PREFIX,
                site.id()
            );
            continue;
        }

        log::debug!("{} Initializing site {:?}...", LOG_PREFIX, site.id());
        match site.init(host) {
            Ok(true) => initialized.push(site.id().to_string()),
            Ok(false) => log::debug!("{} Site {:?} already initialized", LOG_PREFIX, site.id()),
            Err(err) => log::error!("{} Error for site {:?}: {}", LOG_PREFIX, site.id(), err),
        }
    }

    initialized
}
