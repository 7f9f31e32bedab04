use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, Window};

use crate::error::EnhanceError;

/// The handful of element operations the enhancements need.
///
/// Implemented for [`web_sys::Element`]; tests use an in-memory element so
/// the controllers run unchanged outside a browser.
pub trait PageElement: Clone + PartialEq + 'static {
    fn has_class(&self, class: &str) -> bool;
    fn set_class(&self, class: &str, on: bool);
    fn attr(&self, name: &str) -> Option<String>;
    fn set_attr(&self, name: &str, value: &str);
    fn set_text(&self, text: &str);
    fn text(&self) -> String;
    /// An empty `value` removes the property.
    fn set_style(&self, property: &str, value: &str);
    fn set_disabled(&self, disabled: bool);
    fn set_value(&self, value: &str);

    fn data(&self, key: &str) -> Option<String> {
        self.attr(&format!("data-{}", key))
    }

    fn add_class(&self, class: &str) {
        self.set_class(class, true);
    }

    fn remove_class(&self, class: &str) {
        self.set_class(class, false);
    }

    /// Flips `class` and returns whether it is now present.
    fn toggle_class(&self, class: &str) -> bool {
        let on = !self.has_class(class);
        self.set_class(class, on);
        on
    }
}

impl PageElement for Element {
    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn set_class(&self, class: &str, on: bool) {
        let list = self.class_list();
        let result = if on { list.add_1(class) } else { list.remove_1(class) };
        report("class", class, result);
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attr(&self, name: &str, value: &str) {
        report("attribute", name, self.set_attribute(name, value));
    }

    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn text(&self) -> String {
        self.text_content().unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Some(html) = self.dyn_ref::<HtmlElement>() {
            let style = html.style();
            let result = if value.is_empty() {
                style.remove_property(property).map(|_| ())
            } else {
                style.set_property(property, value)
            };
            report("style", property, result);
        }
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(button) = self.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if let Some(input) = self.dyn_ref::<HtmlInputElement>() {
            input.set_disabled(disabled);
        } else if disabled {
            report("attribute", "disabled", self.set_attribute("disabled", ""));
        } else {
            report("attribute", "disabled", self.remove_attribute("disabled"));
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }
}

/// DOM setters only fail on bad input (e.g. a class name with a space).
fn report(what: &str, name: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        warn!("Could not set {} `{}`: {:?}", what, name, e);
    }
}

pub fn by_id(document: &Document, id: &str) -> Result<Element, EnhanceError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| EnhanceError::missing(format!("#{}", id)))
}

pub fn query(root: &Element, selector: &str) -> Result<Element, EnhanceError> {
    root.query_selector(selector)?
        .ok_or_else(|| EnhanceError::missing(selector))
}

/// Every element under `document` matching `selector`, in document order.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, EnhanceError> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn body(document: &Document) -> Result<Element, EnhanceError> {
    document
        .body()
        .map(Element::from)
        .ok_or_else(|| EnhanceError::missing("body"))
}

/// User preferences read once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    pub reduced_motion: bool,
    pub hover: bool,
}

impl Preferences {
    pub fn detect(window: &Window) -> Self {
        Self {
            reduced_motion: media_matches(window, "(prefers-reduced-motion: reduce)"),
            hover: media_matches(window, "(hover: hover)"),
        }
    }

    pub fn allows_particles(&self) -> bool {
        !self.reduced_motion
    }

    pub fn allows_cursor(&self) -> bool {
        self.hover && !self.reduced_motion
    }
}

fn media_matches(window: &Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}
