/// Shared "open in new tab" helper. Features go through this instead of
/// calling `window.open` themselves.
use crate::dom::Page;
use crate::event::ClickEvent;

const LOG_PREFIX: &str = "[MiddleClick Everywhere][openTab]";

pub const NEW_TAB_TARGET: &str = "_blank";
pub const NEW_TAB_FEATURES: &str = "noopener";

/// Suppress the triggering event (no autoscroll, no page handlers) and open
/// `url` in a fresh context without an opener. An empty URL does nothing.
pub fn open_in_new_tab<P: Page>(page: &P, event: &P::Event, url: &str) {
    if url.is_empty() {
        return;
    }

    event.suppress();

    if let Err(err) = page.open_window(url, NEW_TAB_TARGET, NEW_TAB_FEATURES) {
        log::error!("{} Failed to open tab: {}", LOG_PREFIX, err);
    }
}
