/// MiddleClick Everywhere - middle-click opens site search results in a new tab
/// Built with Rust + WASM + Yew

pub mod dom;
pub mod engine;
pub mod error;
pub mod event;
pub mod feature;
pub mod navigation;
pub mod registry;
pub mod selector;
pub mod settings;
pub mod site;
pub mod sites;
pub mod storage;
pub mod ui;
pub mod web;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Set up panic hook and logging for both the content script and the popup
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
}

// Entry point of the content script injected into every page
#[wasm_bindgen]
pub fn start_content_script() {
    spawn_local(web::run_content_script());
}

// Start the Yew app for the settings popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
