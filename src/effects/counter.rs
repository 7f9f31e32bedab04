use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use web_sys::js_sys::Number;
use web_sys::Document;

use crate::config::CounterConfig;
use crate::dom::{self, PageElement};
use crate::error::EnhanceError;
use crate::observer::{Entry, Observe, ObserverOptions, Subscriptions, ViewportObserver};
use crate::scheduler::Scheduler;

pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Reads a leading unsigned integer the way `parseInt` does: leading
/// whitespace is skipped and parsing stops at the first non-digit. Values
/// past `u64::MAX` saturate.
pub fn parse_target(raw: &str) -> Option<u64> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Renders a counter value with digit grouping.
pub trait NumberFormat {
    fn format(&self, value: u64) -> String;
}

/// The browser's own grouping, as `Number.prototype.toLocaleString` gives
/// it. `"default"` means the user's locale.
pub struct LocaleFormat {
    locale: String,
}

impl LocaleFormat {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl NumberFormat for LocaleFormat {
    fn format(&self, value: u64) -> String {
        Number::from(value as f64)
            .to_locale_string(&self.locale)
            .into()
    }
}

/// What a counter shows `elapsed` ms after it started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub value: u64,
    pub done: bool,
}

/// Progress is a function of wall-clock time, not of how many frames ran.
pub fn frame_at(target: u64, elapsed: f64, duration: f64) -> Frame {
    let progress = if duration > 0.0 {
        (elapsed.max(0.0) / duration).min(1.0)
    } else {
        1.0
    };
    if progress < 1.0 {
        let value = (ease_out_cubic(progress) * target as f64).floor() as u64;
        Frame {
            value: value.min(target),
            done: false,
        }
    } else {
        // exact target, no flooring undershoot
        Frame {
            value: target,
            done: true,
        }
    }
}

/// A `.stat-number` element: `data-target` plus optional `data-suffix`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterSpec {
    pub target: u64,
    pub suffix: String,
}

impl CounterSpec {
    /// A missing or malformed target counts as zero.
    pub fn read<E: PageElement>(el: &E) -> Self {
        Self {
            target: el.data("target").as_deref().and_then(parse_target).unwrap_or(0),
            suffix: el.data("suffix").unwrap_or_default(),
        }
    }
}

struct CounterRun<E> {
    el: E,
    spec: CounterSpec,
    start: f64,
    duration: f64,
    format: Rc<dyn NumberFormat>,
    scheduler: Rc<dyn Scheduler>,
}

impl<E: PageElement> CounterRun<E> {
    fn render(&self, value: u64) {
        self.el
            .set_text(&format!("{}{}", self.format.format(value), self.spec.suffix));
    }

    fn schedule(self: Rc<Self>) {
        let scheduler = self.scheduler.clone();
        scheduler.request_frame(Box::new(move |timestamp: f64| self.step(timestamp)));
    }

    fn step(self: Rc<Self>, timestamp: f64) {
        if self.spec.target == 0 {
            self.render(0);
            return;
        }
        let frame = frame_at(self.spec.target, timestamp - self.start, self.duration);
        self.render(frame.value);
        if !frame.done {
            self.schedule();
        }
    }
}

/// Counts `el` up from zero to its target, one frame at a time.
pub fn animate<E: PageElement>(
    el: E,
    scheduler: Rc<dyn Scheduler>,
    format: Rc<dyn NumberFormat>,
    config: &CounterConfig,
) {
    let run = Rc::new(CounterRun {
        spec: CounterSpec::read(&el),
        el,
        start: scheduler.now(),
        duration: config.duration_ms,
        format,
        scheduler,
    });
    run.schedule();
}

/// Starts each counter the first time it is half visible.
pub struct CounterController<E> {
    subscriptions: Subscriptions<E>,
    scheduler: Rc<dyn Scheduler>,
    format: Rc<dyn NumberFormat>,
    config: CounterConfig,
}

impl<E: PageElement> CounterController<E> {
    pub fn new(
        targets: Vec<E>,
        scheduler: Rc<dyn Scheduler>,
        format: Rc<dyn NumberFormat>,
        config: &CounterConfig,
    ) -> Self {
        Self {
            subscriptions: Subscriptions::new(targets),
            scheduler,
            format,
            config: config.clone(),
        }
    }

    pub fn subscriptions(&self) -> &Subscriptions<E> {
        &self.subscriptions
    }

    pub fn handle(&mut self, entries: Vec<Entry<E>>, observer: &dyn Observe<E>) {
        for entry in entries.into_iter().filter(|e| e.is_intersecting) {
            if self.subscriptions.end(&entry.target, observer) {
                animate(
                    entry.target,
                    self.scheduler.clone(),
                    self.format.clone(),
                    &self.config,
                );
            }
        }
    }
}

pub fn install(
    document: &Document,
    scheduler: Rc<dyn Scheduler>,
    config: &CounterConfig,
) -> Result<(), EnhanceError> {
    let targets = dom::query_all(document, &config.selector)?;
    let format: Rc<dyn NumberFormat> = Rc::new(LocaleFormat::new(config.locale.as_str()));
    let controller = Rc::new(RefCell::new(CounterController::new(targets, scheduler, format, config)));
    if controller.borrow().subscriptions().is_empty() {
        return Err(EnhanceError::missing(config.selector.as_str()));
    }

    let handler = controller.clone();
    let observer = ViewportObserver::new(
        &ObserverOptions::new(config.threshold, ""),
        move |entries, observer| handler.borrow_mut().handle(entries, observer),
    );
    if observer.is_inert() {
        return Err(EnhanceError::Unsupported("IntersectionObserver"));
    }
    let controller = controller.borrow();
    controller.subscriptions().attach(&observer);

    debug!("Watching {} counters", controller.subscriptions().len());
    Ok(())
}
