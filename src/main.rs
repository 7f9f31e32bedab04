use log::{info, Level, LevelFilter};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Window};

mod config;
mod dom;
mod error;
mod observer;
mod page;
mod scheduler;
mod effects {
    pub mod active_nav;
    pub mod counter;
    pub mod cursor;
    pub mod reveal;
}
mod bindings {
    pub mod back_to_top;
    pub mod navigation;
    pub mod newsletter;
    pub mod particles;
    pub mod smooth_scroll;
}
#[cfg(test)]
mod testing;

use config::Config;

fn start(window: &Window, document: &Document) {
    let config = Config::from_document(document);
    log::set_max_level(LevelFilter::from(config.log_level));
    page::enhance(window, document, &config);
}

/// Returns false when a logger is already installed; the enhancements run
/// either way.
fn init_logging() -> bool {
    if console_log::init_with_level(Level::Trace).is_err() {
        return false;
    }
    // the page config narrows this once read
    log::set_max_level(LevelFilter::Info);
    true
}

/// Starts now, or on DOMContentLoaded while the document is still loading.
fn run(window: &Window, document: &Document) {
    if document.ready_state() == "loading" {
        info!("Waiting for DOMContentLoaded");
        let ready_window = window.clone();
        let ready_document = document.clone();
        let on_ready = Closure::once_into_js(move || start(&ready_window, &ready_document));
        if let Err(e) = document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
            log::warn!("Could not wait for DOMContentLoaded: {:?}", e);
        }
    } else {
        start(window, document);
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    init_logging();

    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    run(&window, &document);
}
