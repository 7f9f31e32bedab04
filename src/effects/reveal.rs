use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use web_sys::Document;

use crate::config::RevealConfig;
use crate::dom::{self, PageElement};
use crate::error::EnhanceError;
use crate::observer::{Entry, Observe, ObserverOptions, Subscriptions, ViewportObserver};
use crate::scheduler::Scheduler;

/// Stagger steps from `data-delay`, fractions allowed. Missing, malformed
/// or negative means no delay.
pub fn delay_steps<E: PageElement>(el: &E) -> f64 {
    el.data("delay")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|steps| steps.is_finite() && *steps > 0.0)
        .unwrap_or(0.0)
}

/// Milliseconds to wait before revealing.
pub fn delay_ms(steps: f64, stagger_ms: u32) -> u32 {
    (steps * f64::from(stagger_ms)).round().min(f64::from(u32::MAX)) as u32
}

/// Reveals each element once, the first time it scrolls into view.
///
/// The subscription ends as soon as the element is seen; the marker class
/// lands `delay × stagger` ms later. The delay is only a cosmetic stagger,
/// so nothing can cancel it.
pub struct RevealController<E> {
    subscriptions: Subscriptions<E>,
    scheduler: Rc<dyn Scheduler>,
    stagger_ms: u32,
    class: String,
}

impl<E: PageElement> RevealController<E> {
    pub fn new(targets: Vec<E>, scheduler: Rc<dyn Scheduler>, config: &RevealConfig) -> Self {
        Self {
            subscriptions: Subscriptions::new(targets),
            scheduler,
            stagger_ms: config.stagger_ms,
            class: config.class.clone(),
        }
    }

    pub fn subscriptions(&self) -> &Subscriptions<E> {
        &self.subscriptions
    }

    pub fn handle(&mut self, entries: Vec<Entry<E>>, observer: &dyn Observe<E>) {
        for entry in entries.into_iter().filter(|e| e.is_intersecting) {
            if !self.subscriptions.end(&entry.target, observer) {
                continue;
            }
            let delay = delay_ms(delay_steps(&entry.target), self.stagger_ms);
            let target = entry.target;
            let class = self.class.clone();
            self.scheduler.after(
                delay,
                Box::new(move || target.add_class(&class)),
            );
        }
    }
}

pub fn install(
    document: &Document,
    scheduler: Rc<dyn Scheduler>,
    config: &RevealConfig,
) -> Result<(), EnhanceError> {
    let targets = dom::query_all(document, &config.selector)?;
    let controller = Rc::new(RefCell::new(RevealController::new(targets, scheduler, config)));
    if controller.borrow().subscriptions().is_empty() {
        return Err(EnhanceError::missing(config.selector.as_str()));
    }

    let handler = controller.clone();
    let observer = ViewportObserver::new(
        &ObserverOptions::new(config.threshold, config.root_margin.as_str()),
        move |entries, observer| handler.borrow_mut().handle(entries, observer),
    );
    if observer.is_inert() {
        return Err(EnhanceError::Unsupported("IntersectionObserver"));
    }
    let controller = controller.borrow();
    controller.subscriptions().attach(&observer);

    debug!("Watching {} reveal elements", controller.subscriptions().len());
    Ok(())
}
