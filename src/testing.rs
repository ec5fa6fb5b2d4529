/// In-memory stand-ins for the browser, shared by the unit tests
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};

use crate::dom::{DomNode, Page, Rect};
use crate::error::{FeatureError, PlatformError, StorageError};
use crate::event::{ClickEvent, EventKind, MIDDLE_BUTTON};
use crate::feature::Feature;
use crate::selector::Selector;
use crate::settings::StorageBackend;
use crate::site::{ListenerHost, Site};

// ----------------------------------------
// Storage
// ----------------------------------------

#[derive(Default)]
pub struct MemoryStorage {
    values: RefCell<Map<String, Value>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: Value) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::Read {
                key: key.to_string(),
                reason: "injected".to_string(),
            });
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "injected".to_string(),
            });
        }
        self.writes.set(self.writes.get() + 1);
        self.insert(key, value);
        Ok(())
    }
}

// ----------------------------------------
// DOM
// ----------------------------------------

struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    inner_text: Option<String>,
    value: Option<String>,
    rect: Rect,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<FakeNode>,
}

/// An element in a fake DOM tree. Equality is identity.
#[derive(Clone)]
pub struct FakeNode(Rc<RefCell<NodeData>>);

impl FakeNode {
    pub fn element(tag: &str) -> Self {
        FakeNode(Rc::new(RefCell::new(NodeData {
            tag: tag.to_ascii_uppercase(),
            attributes: BTreeMap::new(),
            text: None,
            inner_text: None,
            value: None,
            rect: Rect::default(),
            parent: Weak::new(),
            children: Vec::new(),
        })))
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.0.borrow_mut().attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    /// Own text node
    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text = Some(text.to_string());
        self
    }

    /// Override the rendered text of the subtree
    pub fn with_inner_text(self, text: &str) -> Self {
        self.0.borrow_mut().inner_text = Some(text.to_string());
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        self.0.borrow_mut().value = Some(value.to_string());
        self
    }

    pub fn with_rect(self, rect: Rect) -> Self {
        self.0.borrow_mut().rect = rect;
        self
    }

    pub fn with_child(self, child: FakeNode) -> Self {
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child);
        self
    }

    /// Path from this node up to the root, the shape `composedPath()` has
    pub fn path(&self) -> Vec<FakeNode> {
        let mut path = Vec::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            current = node.parent();
            path.push(node);
        }
        path
    }
}

impl PartialEq for FakeNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for FakeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.outer_html())
    }
}

impl DomNode for FakeNode {
    fn tag_name(&self) -> String {
        self.0.borrow().tag.clone()
    }

    fn id(&self) -> String {
        self.attribute("id").unwrap_or_default()
    }

    fn class_name(&self) -> String {
        self.attribute("class").unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.upgrade().map(FakeNode)
    }

    fn children(&self) -> Vec<Self> {
        self.0.borrow().children.clone()
    }

    fn value(&self) -> Option<String> {
        self.0.borrow().value.clone()
    }

    fn text(&self) -> String {
        if let Some(text) = &self.0.borrow().inner_text {
            return text.clone();
        }
        self.text_nodes().join("\n")
    }

    fn text_nodes(&self) -> Vec<String> {
        let mut texts: Vec<String> = self.0.borrow().text.iter().cloned().collect();
        for child in self.children() {
            texts.extend(child.text_nodes());
        }
        texts
    }

    fn bounding_rect(&self) -> Rect {
        self.0.borrow().rect
    }

    fn outer_html(&self) -> String {
        let data = self.0.borrow();
        let tag = data.tag.to_ascii_lowercase();
        let attributes: String = data
            .attributes
            .iter()
            .map(|(name, value)| format!(" {}=\"{}\"", name, value))
            .collect();
        format!("<{}{}>...</{}>", tag, attributes, tag)
    }
}

// ----------------------------------------
// Page and events
// ----------------------------------------

pub struct FakePage {
    body: FakeNode,
    hits: RefCell<Vec<FakeNode>>,
    opened: RefCell<Vec<(String, String, String)>>,
    fail_open: Cell<bool>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::with_body(FakeNode::element("body"))
    }

    pub fn with_body(body: FakeNode) -> Self {
        FakePage {
            body,
            hits: RefCell::new(Vec::new()),
            opened: RefCell::new(Vec::new()),
            fail_open: Cell::new(false),
        }
    }

    /// What `elementsFromPoint` returns, wherever the pointer is
    pub fn set_hits(&self, hits: Vec<FakeNode>) {
        *self.hits.borrow_mut() = hits;
    }

    pub fn fail_open(&self, fail: bool) {
        self.fail_open.set(fail);
    }

    pub fn opened(&self) -> Vec<(String, String, String)> {
        self.opened.borrow().clone()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened().into_iter().map(|(url, _, _)| url).collect()
    }
}

impl Page for FakePage {
    type Node = FakeNode;
    type Event = FakeEvent;

    fn query_selector(&self, selector: &Selector) -> Option<FakeNode> {
        if self.body.matches(selector) {
            return Some(self.body.clone());
        }
        self.body.query_selector(selector)
    }

    fn query_selector_all(&self, selector: &Selector) -> Vec<FakeNode> {
        let mut found = Vec::new();
        if self.body.matches(selector) {
            found.push(self.body.clone());
        }
        found.extend(self.body.query_selector_all(selector));
        found
    }

    fn body(&self) -> Option<FakeNode> {
        Some(self.body.clone())
    }

    fn elements_from_point(&self, _x: f64, _y: f64) -> Vec<FakeNode> {
        self.hits.borrow().clone()
    }

    fn open_window(&self, url: &str, target: &str, features: &str) -> Result<(), PlatformError> {
        if self.fail_open.get() {
            return Err(PlatformError::Open {
                url: url.to_string(),
                reason: "popup blocked".to_string(),
            });
        }
        self.opened
            .borrow_mut()
            .push((url.to_string(), target.to_string(), features.to_string()));
        Ok(())
    }
}

pub struct FakeEvent {
    button: i16,
    x: f64,
    y: f64,
    path: Vec<FakeNode>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl FakeEvent {
    pub fn with_button(button: i16) -> Self {
        FakeEvent {
            button,
            x: 0.0,
            y: 0.0,
            path: Vec::new(),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    pub fn middle() -> Self {
        Self::with_button(MIDDLE_BUTTON)
    }

    /// Middle-button event whose target is `node`
    pub fn middle_on(node: &FakeNode) -> Self {
        let mut event = Self::middle();
        event.path = node.path();
        event
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

impl ClickEvent for FakeEvent {
    type Node = FakeNode;

    fn button(&self) -> i16 {
        self.button
    }

    fn client_x(&self) -> f64 {
        self.x
    }

    fn client_y(&self) -> f64 {
        self.y
    }

    fn composed_path(&self) -> Vec<FakeNode> {
        self.path.clone()
    }

    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }
}

// ----------------------------------------
// Sites and features
// ----------------------------------------

pub struct RecordingHost {
    attached: RefCell<Vec<(String, EventKind)>>,
    fail_for: Option<String>,
    fail_all: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        RecordingHost {
            attached: RefCell::new(Vec::new()),
            fail_for: None,
            fail_all: false,
        }
    }

    pub fn failing() -> Self {
        RecordingHost {
            fail_all: true,
            ..Self::new()
        }
    }

    pub fn failing_for(site_id: &str) -> Self {
        RecordingHost {
            fail_for: Some(site_id.to_string()),
            ..Self::new()
        }
    }

    pub fn attached(&self) -> Vec<(String, EventKind)> {
        self.attached.borrow().clone()
    }

    pub fn attach_count(&self, site_id: &str) -> usize {
        self.attached.borrow().iter().filter(|(id, _)| id == site_id).count()
    }
}

impl ListenerHost<FakePage> for RecordingHost {
    fn attach(&self, kind: EventKind, site: Rc<Site<FakePage>>) -> Result<(), PlatformError> {
        if self.fail_all || self.fail_for.as_deref() == Some(site.id()) {
            return Err(PlatformError::Listener {
                event: kind.dom_name().to_string(),
                reason: "injected".to_string(),
            });
        }
        self.attached.borrow_mut().push((site.id().to_string(), kind));
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Outcome {
    Claim,
    Decline,
    Fail,
    Undefined,
}

/// Feature that records `<name>:<event>` for every call it receives
pub struct RecordingFeature {
    name: String,
    down: Outcome,
    aux: Outcome,
    calls: Rc<RefCell<Vec<String>>>,
}

impl RecordingFeature {
    pub fn calls() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn build(name: &str, down: Outcome, aux: Outcome, calls: &Rc<RefCell<Vec<String>>>) -> Self {
        RecordingFeature {
            name: name.to_string(),
            down,
            aux,
            calls: Rc::clone(calls),
        }
    }

    pub fn claiming(name: &str, calls: &Rc<RefCell<Vec<String>>>) -> Self {
        Self::build(name, Outcome::Claim, Outcome::Claim, calls)
    }

    pub fn declining(name: &str, calls: &Rc<RefCell<Vec<String>>>) -> Self {
        Self::build(name, Outcome::Decline, Outcome::Decline, calls)
    }

    pub fn failing(name: &str, calls: &Rc<RefCell<Vec<String>>>) -> Self {
        Self::build(name, Outcome::Fail, Outcome::Fail, calls)
    }

    /// Defines only the aux-click handler
    pub fn aux_only(name: &str, calls: &Rc<RefCell<Vec<String>>>) -> Self {
        Self::build(name, Outcome::Undefined, Outcome::Claim, calls)
    }

    pub fn boxed(self) -> Box<dyn Feature<FakePage>> {
        Box::new(self)
    }

    fn respond(&self, kind: EventKind, outcome: Outcome) -> Result<bool, FeatureError> {
        if matches!(outcome, Outcome::Undefined) {
            return Ok(false);
        }
        self.calls
            .borrow_mut()
            .push(format!("{}:{}", self.name, kind.dom_name()));
        match outcome {
            Outcome::Claim => Ok(true),
            Outcome::Fail => Err(FeatureError::Other("handler blew up".to_string())),
            Outcome::Decline | Outcome::Undefined => Ok(false),
        }
    }
}

impl Feature<FakePage> for RecordingFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_primary_down(&self, _page: &FakePage, _event: &FakeEvent) -> Result<bool, FeatureError> {
        self.respond(EventKind::PrimaryDown, self.down)
    }

    fn handle_aux_click(&self, _page: &FakePage, _event: &FakeEvent) -> Result<bool, FeatureError> {
        self.respond(EventKind::AuxClick, self.aux)
    }
}
