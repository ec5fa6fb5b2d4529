/// Pointer events intercepted by the extension
use crate::dom::DomNode;

/// `MouseEvent.button` value of the middle (wheel) button
pub const MIDDLE_BUTTON: i16 = 1;

/// The two capture-phase listeners each site installs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `mousedown`: claimed to stop autoscroll from starting
    PrimaryDown,
    /// `auxclick`: fires on middle-button release
    AuxClick,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::PrimaryDown, EventKind::AuxClick];

    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::PrimaryDown => "mousedown",
            EventKind::AuxClick => "auxclick",
        }
    }
}

pub trait ClickEvent {
    type Node: DomNode;

    fn button(&self) -> i16;
    fn client_x(&self) -> f64;
    fn client_y(&self) -> f64;

    /// Element nodes of `composedPath()`, innermost first
    fn composed_path(&self) -> Vec<Self::Node>;

    fn prevent_default(&self);
    fn stop_propagation(&self);

    fn is_middle_button(&self) -> bool {
        self.button() == MIDDLE_BUTTON
    }

    /// Swallow the event so the page never sees it
    fn suppress(&self) {
        self.prevent_default();
        self.stop_propagation();
    }
}
