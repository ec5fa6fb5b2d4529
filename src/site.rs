/// Site module factory.
///
/// A site owns the plumbing every site needs: URL matching, one-time listener
/// attachment and the first-claim dispatch loop over its features. Sites only
/// provide an id, a predicate and their features; most use [`Site::for_domain`].

use std::cell::Cell;
use std::rc::Rc;

use crate::dom::Page;
use crate::error::{MatchError, PlatformError};
use crate::event::{ClickEvent, EventKind};
use crate::feature::Feature;

const DEFAULT_LOG_PREFIX: &str = "[MiddleClick Everywhere]";

/// Stable identifier, also used as the storage key in `siteEnabled`
pub type SiteId = String;

pub type MatchPredicate = Box<dyn Fn(&str) -> Result<bool, MatchError>>;

/// Attaches capture-phase window listeners that feed events back to a site
pub trait ListenerHost<P: Page> {
    fn attach(&self, kind: EventKind, site: Rc<Site<P>>) -> Result<(), PlatformError>;
}

pub struct Site<P: Page> {
    id: SiteId,
    predicate: MatchPredicate,
    features: Vec<Box<dyn Feature<P>>>,
    log_prefix: Option<String>,
    initialized: Cell<bool>,
}

impl<P: Page> Site<P> {
    pub fn new(
        id: impl Into<SiteId>,
        predicate: impl Fn(&str) -> Result<bool, MatchError> + 'static,
        features: Vec<Box<dyn Feature<P>>>,
        log_prefix: Option<String>,
    ) -> Self {
        Site {
            id: id.into(),
            predicate: Box::new(predicate),
            features,
            log_prefix,
            initialized: Cell::new(false),
        }
    }

    /// Run this site whenever the URL string contains `domain_substring`.
    ///
    /// The check is not anchored to the hostname, so `?ref=youtube.com` on an
    /// unrelated site also matches.
    pub fn for_domain(
        id: impl Into<SiteId>,
        domain_substring: impl Into<String>,
        features: Vec<Box<dyn Feature<P>>>,
        log_prefix: Option<String>,
    ) -> Self {
        let id = id.into();
        let domain_substring = domain_substring.into();
        let log_prefix = log_prefix.unwrap_or_else(|| format!("[MiddleClick Everywhere - {}]", id));

        Site::new(
            id,
            move |url: &str| Ok(url.contains(domain_substring.as_str())),
            features,
            Some(log_prefix),
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|feature| feature.name()).collect()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// A failing predicate disables the site instead of the engine
    pub fn matches(&self, url: &str) -> bool {
        match (self.predicate)(url) {
            Ok(matched) => matched,
            Err(err) => {
                log::error!(
                    "{} match() error: {}",
                    self.log_prefix.as_deref().unwrap_or(DEFAULT_LOG_PREFIX),
                    err
                );
                false
            }
        }
    }

    /// Attach the window listeners. Only the first call does anything;
    /// returns whether this call attached them.
    pub fn init<H: ListenerHost<P>>(self: &Rc<Self>, host: &H) -> Result<bool, PlatformError> {
        if self.initialized.replace(true) {
            return Ok(false);
        }

        for kind in EventKind::ALL {
            host.attach(kind, Rc::clone(self))?;
        }

        self.debug_log(&format!(
            "site module initialized with features: {:?}",
            self.feature_names()
        ));

        Ok(true)
    }

    /// Offer a middle-button event to each feature in registration order.
    /// Returns the name of the feature that claimed it.
    pub fn dispatch(&self, kind: EventKind, page: &P, event: &P::Event) -> Option<&str> {
        if !event.is_middle_button() {
            return None;
        }

        for feature in &self.features {
            match feature.handle(kind, page, event) {
                Ok(true) => {
                    self.debug_log(&format!(
                        "{} handled by feature: {}",
                        kind.dom_name(),
                        feature.name()
                    ));
                    return Some(feature.name());
                }
                Ok(false) => {}
                Err(err) => {
                    log::error!(
                        "{} Feature {} {} error: {}",
                        self.log_prefix.as_deref().unwrap_or(DEFAULT_LOG_PREFIX),
                        feature.name(),
                        kind.dom_name(),
                        err
                    );
                }
            }
        }

        None
    }

    fn debug_log(&self, message: &str) {
        if let Some(prefix) = &self.log_prefix {
            log::debug!("{} {}", prefix, message);
        }
    }
}
