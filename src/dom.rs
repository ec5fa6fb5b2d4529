/// DOM abstractions consumed by the site heuristics.
///
/// The browser implementation lives in `web`; tests use an in-memory tree.

use crate::error::PlatformError;
use crate::event::ClickEvent;
use crate::selector::Selector;

/// Client-space bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Edges are inclusive
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// An element in the page
pub trait DomNode: Clone {
    fn tag_name(&self) -> String;
    fn id(&self) -> String;
    fn class_name(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn parent(&self) -> Option<Self>;
    fn children(&self) -> Vec<Self>;

    /// Current value of a form control, `None` for other elements
    fn value(&self) -> Option<String>;

    /// Rendered text of the subtree (`innerText`, falling back to `textContent`)
    fn text(&self) -> String;

    /// Raw text-node values of the subtree in document order
    fn text_nodes(&self) -> Vec<String>;

    fn bounding_rect(&self) -> Rect;
    fn outer_html(&self) -> String;

    fn matches(&self, selector: &Selector) -> bool {
        selector.matches(self)
    }

    /// Nearest ancestor-or-self matching the selector
    fn closest(&self, selector: &Selector) -> Option<Self> {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.matches(selector) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// First matching descendant in document order
    fn query_selector(&self, selector: &Selector) -> Option<Self> {
        for child in self.children() {
            if child.matches(selector) {
                return Some(child);
            }
            if let Some(found) = child.query_selector(selector) {
                return Some(found);
            }
        }
        None
    }

    /// All matching descendants in document order
    fn query_selector_all(&self, selector: &Selector) -> Vec<Self> {
        let mut found = Vec::new();
        for child in self.children() {
            if child.matches(selector) {
                found.push(child.clone());
            }
            found.extend(child.query_selector_all(selector));
        }
        found
    }
}

/// Document-level access for one page
pub trait Page {
    type Node: DomNode;
    type Event: ClickEvent<Node = Self::Node>;

    fn query_selector(&self, selector: &Selector) -> Option<Self::Node>;
    fn query_selector_all(&self, selector: &Selector) -> Vec<Self::Node>;
    fn body(&self) -> Option<Self::Node>;

    /// Hit test, topmost element first
    fn elements_from_point(&self, x: f64, y: f64) -> Vec<Self::Node>;

    /// `window.open(url, target, features)`
    fn open_window(&self, url: &str, target: &str, features: &str) -> Result<(), PlatformError>;
}
