use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// How visible an element must be before it is reported.
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Visible fraction, 0.0 to 1.0.
    pub threshold: f64,
    /// CSS margin applied to the viewport, e.g. `"0px 0px -50px 0px"`.
    pub root_margin: String,
}

impl ObserverOptions {
    pub fn new(threshold: f64, root_margin: impl Into<String>) -> Self {
        Self {
            threshold,
            root_margin: root_margin.into(),
        }
    }
}

/// One visibility change, delivered in batches in observation order.
#[derive(Clone, Debug)]
pub struct Entry<E> {
    pub target: E,
    pub is_intersecting: bool,
}

pub trait Observe<E> {
    fn observe(&self, target: &E);
    fn unobserve(&self, target: &E);
}

impl Observe<Element> for IntersectionObserver {
    fn observe(&self, target: &Element) {
        IntersectionObserver::observe(self, target);
    }

    fn unobserve(&self, target: &Element) {
        IntersectionObserver::unobserve(self, target);
    }
}

/// The set of live subscriptions a controller holds on one observer.
///
/// A target appears at most once. Ending a subscription unobserves the
/// target before reporting it, so a one-shot controller that acts only on
/// `end() == true` fires at most once per target, even when the browser
/// delivers a stale entry after the unobserve.
pub struct Subscriptions<E> {
    live: Vec<E>,
}

impl<E: PartialEq> Subscriptions<E> {
    pub fn new(targets: impl IntoIterator<Item = E>) -> Self {
        let mut live: Vec<E> = Vec::new();
        for target in targets {
            if !live.contains(&target) {
                live.push(target);
            }
        }
        Self { live }
    }

    #[cfg(test)]
    pub fn is_live(&self, target: &E) -> bool {
        self.live.contains(target)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Starts watching every target.
    pub fn attach(&self, observer: &dyn Observe<E>) {
        for target in &self.live {
            observer.observe(target);
        }
    }

    /// Unsubscribes `target`; returns false if it was not subscribed.
    pub fn end(&mut self, target: &E, observer: &dyn Observe<E>) -> bool {
        match self.live.iter().position(|t| t == target) {
            Some(index) => {
                let target = self.live.swap_remove(index);
                observer.unobserve(&target);
                true
            }
            None => false,
        }
    }
}

/// Browser side of the viewport observer.
///
/// Wraps one `IntersectionObserver`. When the browser has none the observer
/// is inert: `observe` does nothing and the handler never runs.
pub struct ViewportObserver {
    inner: Option<IntersectionObserver>,
}

impl ViewportObserver {
    pub fn new<F>(options: &ObserverOptions, mut handler: F) -> Self
    where
        F: FnMut(Vec<Entry<Element>>, &dyn Observe<Element>) + 'static,
    {
        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            let entries: Vec<Entry<Element>> = entries
                .iter()
                .map(|value| value.unchecked_into::<IntersectionObserverEntry>())
                .map(|entry| Entry {
                    target: entry.target(),
                    is_intersecting: entry.is_intersecting(),
                })
                .collect();
            handler(entries, &observer);
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let inner = match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                // the observer keeps calling back for the life of the page
                callback.forget();
                Some(observer)
            }
            Err(e) => {
                warn!("IntersectionObserver unavailable, elements will not animate: {:?}", e);
                None
            }
        };

        Self { inner }
    }

    /// True when the browser has no `IntersectionObserver`.
    pub fn is_inert(&self) -> bool {
        self.inner.is_none()
    }
}

impl Observe<Element> for ViewportObserver {
    fn observe(&self, target: &Element) {
        match &self.inner {
            Some(observer) => IntersectionObserver::observe(observer, target),
            None => debug!("Observer inert, not watching {}", target.tag_name()),
        }
    }

    fn unobserve(&self, target: &Element) {
        if let Some(observer) = &self.inner {
            IntersectionObserver::unobserve(observer, target);
        }
    }
}
