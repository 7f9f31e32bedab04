use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, ScrollBehavior, ScrollToOptions, Window};

use crate::config::BackToTopConfig;
use crate::dom::{self, PageElement};
use crate::error::EnhanceError;

pub fn should_show(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

pub fn update<E: PageElement>(button: &E, scroll_y: f64, threshold: f64) {
    button.set_class("visible", should_show(scroll_y, threshold));
}

pub fn install(window: &Window, document: &Document, config: &BackToTopConfig) -> Result<(), EnhanceError> {
    let button = dom::by_id(document, &config.button_id)?;

    {
        let button = button.clone();
        let threshold = config.threshold;
        let scroll_window = window.clone();
        let on_scroll = Closure::wrap(Box::new(move || {
            update(&button, scroll_window.scroll_y().unwrap_or_default(), threshold);
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
        on_scroll.forget();
    }

    let click_window = window.clone();
    let on_click = Closure::wrap(Box::new(move || {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        click_window.scroll_to_with_scroll_to_options(&options);
    }) as Box<dyn FnMut()>);
    button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    debug!("Back-to-top button ready");
    Ok(())
}
