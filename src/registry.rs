/// Site registry: which sites exist, which URLs they run on, and the order in
/// which their features see events.

use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::Page;
use crate::feature::Feature;
use crate::site::Site;

/// Per-site configuration that cannot be derived from the feature table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteConfig {
    pub id: &'static str,
    pub domain_substring: &'static str,
    /// Shown in the settings popup
    pub label: &'static str,
    /// Replaces the id in log prefixes
    pub log_name: Option<&'static str>,
}

impl SiteConfig {
    pub fn log_prefix(&self) -> String {
        format!(
            "[MiddleClick Everywhere - {}][site]",
            self.log_name.unwrap_or(self.id)
        )
    }
}

pub const YOUTUBE_SITE_ID: &str = "youtube";

pub const SITE_CONFIGS: &[SiteConfig] = &[SiteConfig {
    id: YOUTUBE_SITE_ID,
    domain_substring: "youtube.com",
    label: "YouTube",
    log_name: None,
}];

/// A feature tagged with its origin path, `<site id>/<feature name>`
pub struct FeatureRegistration<P: Page> {
    path: &'static str,
    feature: Box<dyn Feature<P>>,
}

impl<P: Page> FeatureRegistration<P> {
    pub fn new(path: &'static str, feature: impl Feature<P> + 'static) -> Self {
        FeatureRegistration {
            path,
            feature: Box::new(feature),
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn site_id(&self) -> &'static str {
        self.path.split('/').next().unwrap_or(self.path)
    }
}

pub struct Registry<P: Page> {
    sites: Vec<Rc<Site<P>>>,
}

impl<P: Page> Registry<P> {
    /// Explicit listing; dispatch order is the order given
    pub fn new(sites: Vec<Site<P>>) -> Self {
        Registry {
            sites: sites.into_iter().map(Rc::new).collect(),
        }
    }

    /// Group registrations by site, drop sites without a config entry and
    /// order each site's features by origin path. Sites follow `configs` order.
    pub fn from_registrations(
        configs: &[SiteConfig],
        registrations: Vec<FeatureRegistration<P>>,
    ) -> Self {
        let mut by_site: HashMap<&'static str, Vec<FeatureRegistration<P>>> = HashMap::new();
        for registration in registrations {
            by_site
                .entry(registration.site_id())
                .or_default()
                .push(registration);
        }

        let mut sites = Vec::new();
        for config in configs {
            let Some(mut group) = by_site.remove(config.id) else {
                continue;
            };
            group.sort_by(|a, b| a.path.cmp(b.path));

            let features = group.into_iter().map(|r| r.feature).collect();
            sites.push(Site::for_domain(
                config.id,
                config.domain_substring,
                features,
                Some(config.log_prefix()),
            ));
        }

        for site_id in by_site.keys() {
            log::debug!(
                "[MiddleClick Everywhere][registry] no config for site {:?}, ignoring its features",
                site_id
            );
        }

        Registry::new(sites)
    }

    pub fn sites(&self) -> &[Rc<Site<P>>] {
        &self.sites
    }

    pub fn get(&self, site_id: &str) -> Option<&Rc<Site<P>>> {
        self.sites.iter().find(|site| site.id() == site_id)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// The registry shipped with the extension
pub fn builtin_registry<P: Page + 'static>() -> Registry<P> {
    Registry::from_registrations(SITE_CONFIGS, crate::sites::registrations())
}
