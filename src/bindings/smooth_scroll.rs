use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, ScrollBehavior, ScrollIntoViewOptions};

use crate::dom;
use crate::error::EnhanceError;

pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// The selector an in-page link scrolls to, or `None` for a bare `#` and
/// anything that is not a fragment.
pub fn anchor_target(href: &str) -> Option<&str> {
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

pub fn install(document: &Document) -> Result<(), EnhanceError> {
    let anchors = dom::query_all(document, ANCHOR_SELECTOR)?;
    if anchors.is_empty() {
        return Err(EnhanceError::missing(ANCHOR_SELECTOR));
    }

    for anchor in &anchors {
        let document = document.clone();
        let link = anchor.clone();
        let on_click = Closure::wrap(Box::new(move |e: Event| {
            let href = link.get_attribute("href").unwrap_or_default();
            let Some(selector) = anchor_target(&href) else {
                return;
            };
            // a malformed fragment is not a valid selector; let the browser handle it
            if let Ok(Some(target)) = document.query_selector(selector) {
                e.prevent_default();
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                target.scroll_into_view_with_scroll_into_view_options(&options);
            }
        }) as Box<dyn FnMut(Event)>);
        anchor.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    debug!("Smooth scrolling {} anchors", anchors.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hash_is_skipped() {
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target(""), None);
        assert_eq!(anchor_target("/pricing#faq"), None);
        assert_eq!(anchor_target("#about"), Some("#about"));
    }
}
