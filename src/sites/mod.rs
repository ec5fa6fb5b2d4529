/// Site-specific features.
///
/// To add a feature, implement [`Feature`](crate::feature::Feature) in
/// `sites/<site>/` and list it below as `<site>/<feature>`. A brand-new site
/// also needs an entry in [`SITE_CONFIGS`](crate::registry::SITE_CONFIGS).
use crate::dom::Page;
use crate::registry::FeatureRegistration;

pub mod youtube;

pub fn registrations<P: Page + 'static>() -> Vec<FeatureRegistration<P>> {
    vec![
        FeatureRegistration::new("youtube/search-button", youtube::SearchButton),
        FeatureRegistration::new("youtube/search-suggestions", youtube::SearchSuggestions),
    ]
}
