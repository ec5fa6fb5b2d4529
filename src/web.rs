/// Browser implementations of the storage, DOM and listener traits
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, MouseEvent, Window};

use crate::dom::{DomNode, Page, Rect};
use crate::engine::init_engine;
use crate::error::{describe_js, PlatformError, StorageError};
use crate::event::{ClickEvent, EventKind};
use crate::registry::builtin_registry;
use crate::selector::Selector;
use crate::settings::{SettingsStore, StorageBackend};
use crate::site::{ListenerHost, Site};

/// `NodeFilter.SHOW_TEXT`
const SHOW_TEXT: u32 = 0x4;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn syncGet(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn syncSet(key: &str, value: JsValue) -> Result<(), JsValue>;
}

// ----------------------------------------
// chrome.storage.sync
// ----------------------------------------

pub struct ChromeSyncStorage;

impl StorageBackend for ChromeSyncStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let value = syncGet(key).await.map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: describe_js(&e),
        })?;

        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|e| StorageError::Convert {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        // Plain objects, not JS Maps
        let value_js = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StorageError::Convert {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        syncSet(key, value_js).await.map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: describe_js(&e),
        })
    }
}

// ----------------------------------------
// DOM
// ----------------------------------------

#[derive(Clone)]
pub struct WebNode(Element);

fn elements_of(array: js_sys::Array) -> Vec<WebNode> {
    array
        .iter()
        .filter_map(|value| value.dyn_into::<Element>().ok())
        .map(WebNode)
        .collect()
}

fn node_list_elements(list: web_sys::NodeList) -> Vec<WebNode> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(WebNode)
        .collect()
}

impl DomNode for WebNode {
    fn tag_name(&self) -> String {
        self.0.tag_name()
    }

    fn id(&self) -> String {
        self.0.id()
    }

    // Read the attribute: `className` is not a string on SVG elements
    fn class_name(&self) -> String {
        self.0.get_attribute("class").unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent_element().map(WebNode)
    }

    fn children(&self) -> Vec<Self> {
        let children = self.0.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(WebNode)
            .collect()
    }

    fn value(&self) -> Option<String> {
        self.0.dyn_ref::<HtmlInputElement>().map(|input| input.value())
    }

    fn text(&self) -> String {
        self.0
            .dyn_ref::<HtmlElement>()
            .map(|element| element.inner_text())
            .filter(|text| !text.is_empty())
            .or_else(|| self.0.text_content())
            .unwrap_or_default()
    }

    fn text_nodes(&self) -> Vec<String> {
        let Some(document) = self.0.owner_document() else {
            return Vec::new();
        };
        let Ok(walker) = document.create_tree_walker_with_what_to_show(&self.0, SHOW_TEXT) else {
            return Vec::new();
        };

        let mut pieces = Vec::new();
        while let Ok(Some(node)) = walker.next_node() {
            if let Some(value) = node.node_value() {
                pieces.push(value);
            }
        }
        pieces
    }

    fn bounding_rect(&self) -> Rect {
        let rect = self.0.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
    }

    fn outer_html(&self) -> String {
        self.0.outer_html()
    }

    fn matches(&self, selector: &Selector) -> bool {
        self.0.matches(&selector.to_css()).unwrap_or(false)
    }

    fn closest(&self, selector: &Selector) -> Option<Self> {
        self.0.closest(&selector.to_css()).ok().flatten().map(WebNode)
    }

    fn query_selector(&self, selector: &Selector) -> Option<Self> {
        self.0.query_selector(&selector.to_css()).ok().flatten().map(WebNode)
    }

    fn query_selector_all(&self, selector: &Selector) -> Vec<Self> {
        self.0
            .query_selector_all(&selector.to_css())
            .map(node_list_elements)
            .unwrap_or_default()
    }
}

pub struct WebClickEvent(MouseEvent);

impl ClickEvent for WebClickEvent {
    type Node = WebNode;

    fn button(&self) -> i16 {
        self.0.button()
    }

    fn client_x(&self) -> f64 {
        self.0.client_x() as f64
    }

    fn client_y(&self) -> f64 {
        self.0.client_y() as f64
    }

    // Window and Document entries are dropped
    fn composed_path(&self) -> Vec<WebNode> {
        elements_of(self.0.composed_path())
    }

    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn stop_propagation(&self) {
        self.0.stop_propagation();
    }
}

pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or(PlatformError::ApiNotFound("window".into()))?;
        let document = window
            .document()
            .ok_or(PlatformError::ApiNotFound("document".into()))?;
        Ok(WebPage { window, document })
    }

    pub fn href(&self) -> Result<String, PlatformError> {
        self.window
            .location()
            .href()
            .map_err(|e| PlatformError::ApiNotFound(format!("location.href: {}", describe_js(&e))))
    }
}

impl Page for WebPage {
    type Node = WebNode;
    type Event = WebClickEvent;

    fn query_selector(&self, selector: &Selector) -> Option<WebNode> {
        self.document
            .query_selector(&selector.to_css())
            .ok()
            .flatten()
            .map(WebNode)
    }

    fn query_selector_all(&self, selector: &Selector) -> Vec<WebNode> {
        self.document
            .query_selector_all(&selector.to_css())
            .map(node_list_elements)
            .unwrap_or_default()
    }

    fn body(&self) -> Option<WebNode> {
        self.document.body().map(|body| WebNode(body.into()))
    }

    fn elements_from_point(&self, x: f64, y: f64) -> Vec<WebNode> {
        elements_of(self.document.elements_from_point(x as f32, y as f32))
    }

    // With `noopener` the call returns null even on success
    fn open_window(&self, url: &str, target: &str, features: &str) -> Result<(), PlatformError> {
        self.window
            .open_with_url_and_target_and_features(url, target, features)
            .map(|_| ())
            .map_err(|e| PlatformError::Open {
                url: url.to_string(),
                reason: describe_js(&e),
            })
    }
}

// ----------------------------------------
// Listeners
// ----------------------------------------

/// Attaches capture-phase listeners on `window` for the page's lifetime
pub struct WindowListeners {
    page: Rc<WebPage>,
}

impl WindowListeners {
    pub fn new(page: Rc<WebPage>) -> Self {
        WindowListeners { page }
    }
}

impl ListenerHost<WebPage> for WindowListeners {
    fn attach(&self, kind: EventKind, site: Rc<Site<WebPage>>) -> Result<(), PlatformError> {
        let page = Rc::clone(&self.page);
        let listener = Closure::wrap(Box::new(move |event: MouseEvent| {
            site.dispatch(kind, &page, &WebClickEvent(event));
        }) as Box<dyn Fn(MouseEvent)>);

        self.page
            .window
            .add_event_listener_with_callback_and_bool(
                kind.dom_name(),
                listener.as_ref().unchecked_ref(),
                true,
            )
            .map_err(|e| PlatformError::Listener {
                event: kind.dom_name().to_string(),
                reason: describe_js(&e),
            })?;

        listener.forget();
        Ok(())
    }
}

/// Content script body: gate on settings, then wire up matching sites
pub async fn run_content_script() {
    let page = match WebPage::new() {
        Ok(page) => Rc::new(page),
        Err(err) => {
            log::error!("[MiddleClick Everywhere][engine] initEngine() top-level error: {}", err);
            return;
        }
    };
    let url = match page.href() {
        Ok(url) => url,
        Err(err) => {
            log::error!("[MiddleClick Everywhere][engine] initEngine() top-level error: {}", err);
            return;
        }
    };

    let settings = SettingsStore::new(ChromeSyncStorage);
    let registry = builtin_registry::<WebPage>();
    let host = WindowListeners::new(page);

    init_engine(&settings, &registry, &url, &host).await;
}
