use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

use crate::config::NavigationConfig;
use crate::dom::{self, PageElement};
use crate::error::EnhanceError;

/// Hamburger menu. Open state lives on the links container's `open` class.
pub struct Menu<E> {
    hamburger: E,
    links: E,
    body: E,
}

impl<E: PageElement> Menu<E> {
    pub fn new(hamburger: E, links: E, body: E) -> Self {
        Self { hamburger, links, body }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.links.has_class("open")
    }

    pub fn toggle(&self) {
        self.hamburger.toggle_class("active");
        let open = self.links.toggle_class("open");
        self.apply(open);
    }

    pub fn close(&self) {
        self.hamburger.remove_class("active");
        self.links.remove_class("open");
        self.apply(false);
    }

    fn apply(&self, open: bool) {
        self.body.set_style("overflow", if open { "hidden" } else { "" });
        self.hamburger
            .set_attr("aria-expanded", if open { "true" } else { "false" });
    }
}

/// Header gets `scrolled` once the page has moved past the threshold.
pub struct ScrollState<E> {
    nav: E,
    threshold: f64,
    last_scroll: Cell<f64>,
}

impl<E: PageElement> ScrollState<E> {
    pub fn new(nav: E, threshold: f64) -> Self {
        Self {
            nav,
            threshold,
            last_scroll: Cell::new(0.0),
        }
    }

    pub fn scrolled_to(&self, y: f64) {
        self.nav.set_class("scrolled", y > self.threshold);
        self.last_scroll.set(y);
    }

    #[cfg(test)]
    pub fn last_scroll(&self) -> f64 {
        self.last_scroll.get()
    }
}

pub fn install(window: &Window, document: &Document, config: &NavigationConfig) -> Result<(), EnhanceError> {
    // the header and the menu are independent; either may be missing
    let header = install_header(window, document, config);
    let menu = install_menu(document, config);
    header.and(menu)
}

fn install_header(window: &Window, document: &Document, config: &NavigationConfig) -> Result<(), EnhanceError> {
    let nav = dom::by_id(document, &config.nav_id)?;
    let state = ScrollState::new(nav, config.scrolled_threshold);
    let scroll_window = window.clone();
    let on_scroll = Closure::wrap(Box::new(move || {
        state.scrolled_to(scroll_window.scroll_y().unwrap_or_default());
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();
    Ok(())
}

fn install_menu(document: &Document, config: &NavigationConfig) -> Result<(), EnhanceError> {
    let hamburger = dom::by_id(document, &config.hamburger_id)?;
    let links = dom::by_id(document, &config.links_id)?;
    let menu = Rc::new(Menu::new(hamburger.clone(), links.clone(), dom::body(document)?));

    {
        let menu = menu.clone();
        let on_click = Closure::wrap(Box::new(move || menu.toggle()) as Box<dyn FnMut()>);
        hamburger.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    let list = links.query_selector_all(&config.link_selector)?;
    for link in (0..list.length()).filter_map(|i| list.get(i)) {
        let menu = menu.clone();
        let on_click = Closure::wrap(Box::new(move || menu.close()) as Box<dyn FnMut()>);
        link.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    debug!("Menu toggle ready, {} links close it", list.length());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeElement;

    fn menu() -> (Menu<FakeElement>, FakeElement, FakeElement, FakeElement) {
        let hamburger = FakeElement::new();
        let links = FakeElement::new();
        let body = FakeElement::new();
        let menu = Menu::new(hamburger.clone(), links.clone(), body.clone());
        (menu, hamburger, links, body)
    }

    #[test]
    fn toggle_opens_and_locks_scroll() {
        let (menu, hamburger, links, body) = menu();

        menu.toggle();

        assert!(menu.is_open());
        assert!(hamburger.has_class("active"));
        assert!(links.has_class("open"));
        assert_eq!(body.style("overflow").as_deref(), Some("hidden"));
        assert_eq!(hamburger.attr("aria-expanded").as_deref(), Some("true"));
    }

    #[test]
    fn toggling_twice_restores_initial_state() {
        let (menu, hamburger, links, body) = menu();

        menu.toggle();
        menu.toggle();

        assert!(!menu.is_open());
        assert!(!hamburger.has_class("active"));
        assert!(!links.has_class("open"));
        assert_eq!(body.style("overflow"), None);
        assert_eq!(hamburger.attr("aria-expanded").as_deref(), Some("false"));
    }

    #[test]
    fn link_click_closes_an_open_menu() {
        let (menu, hamburger, _, body) = menu();

        menu.toggle();
        menu.close();
        assert!(!menu.is_open());
        assert!(!hamburger.has_class("active"));
        assert_eq!(body.style("overflow"), None);

        // closing a closed menu is harmless
        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn header_marks_scrolled_past_threshold() {
        let nav = FakeElement::new();
        let state = ScrollState::new(nav.clone(), 50.0);

        state.scrolled_to(50.0);
        assert!(!nav.has_class("scrolled"));
        state.scrolled_to(51.0);
        assert!(nav.has_class("scrolled"));
        state.scrolled_to(0.0);
        assert!(!nav.has_class("scrolled"));
        assert_eq!(state.last_scroll(), 0.0);
    }
}
