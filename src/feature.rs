/// A feature is one behavior on a site's page. Both handlers default to
/// "not claimed", so a feature only implements the events it cares about.
use crate::dom::Page;
use crate::error::FeatureError;
use crate::event::EventKind;

pub trait Feature<P: Page> {
    fn name(&self) -> &str;

    /// Middle button pressed. Return `Ok(true)` to claim the event.
    fn handle_primary_down(&self, _page: &P, _event: &P::Event) -> Result<bool, FeatureError> {
        Ok(false)
    }

    /// Middle button released. Return `Ok(true)` to claim the event.
    fn handle_aux_click(&self, _page: &P, _event: &P::Event) -> Result<bool, FeatureError> {
        Ok(false)
    }

    fn handle(&self, kind: EventKind, page: &P, event: &P::Event) -> Result<bool, FeatureError> {
        match kind {
            EventKind::PrimaryDown => self.handle_primary_down(page, event),
            EventKind::AuxClick => self.handle_aux_click(page, event),
        }
    }
}
