//! In-memory stand-ins for the browser, used by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::PageElement;
use crate::effects::counter::NumberFormat;
use crate::observer::{Entry, Observe};
use crate::scheduler::{FrameCallback, Scheduler, TimerCallback};

#[derive(Default, Debug)]
struct ElementState {
    classes: Vec<String>,
    attrs: HashMap<String, String>,
    styles: HashMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
}

/// Element identity is the allocation, like a DOM node.
#[derive(Clone, Default, Debug)]
pub struct FakeElement(Rc<RefCell<ElementState>>);

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    pub fn disabled(&self) -> bool {
        self.0.borrow().disabled
    }

    pub fn entry(&self, is_intersecting: bool) -> Entry<FakeElement> {
        Entry {
            target: self.clone(),
            is_intersecting,
        }
    }
}

impl PageElement for FakeElement {
    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn set_class(&self, class: &str, on: bool) {
        let mut state = self.0.borrow_mut();
        state.classes.retain(|c| c != class);
        if on {
            state.classes.push(class.to_string());
        }
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut state = self.0.borrow_mut();
        if value.is_empty() {
            state.styles.remove(property);
        } else {
            state.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn set_disabled(&self, disabled: bool) {
        self.0.borrow_mut().disabled = disabled;
    }

    fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    observed: RefCell<Vec<FakeElement>>,
    unobserved: RefCell<Vec<FakeElement>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observed(&self) -> Vec<FakeElement> {
        self.observed.borrow().clone()
    }

    pub fn unobserved(&self) -> Vec<FakeElement> {
        self.unobserved.borrow().clone()
    }
}

impl Observe<FakeElement> for RecordingObserver {
    fn observe(&self, target: &FakeElement) {
        self.observed.borrow_mut().push(target.clone());
    }

    fn unobserve(&self, target: &FakeElement) {
        self.unobserved.borrow_mut().push(target.clone());
    }
}

#[derive(Default)]
struct Clock {
    now: f64,
    frames: Vec<FrameCallback>,
    timers: Vec<(f64, u64, TimerCallback)>,
    next_seq: u64,
}

/// Virtual clock: nothing runs until the test advances time or pumps a
/// frame.
#[derive(Clone, Default)]
pub struct ManualScheduler(Rc<RefCell<Clock>>);

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_frames(&self) -> usize {
        self.0.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.0.borrow().timers.len()
    }

    /// Advances the clock by `millis`, runs due timers, then runs the frame
    /// callbacks queued before this call. Callbacks they queue wait for the
    /// next frame.
    pub fn frame(&self, millis: f64) {
        self.advance(millis);
        let (now, frames) = {
            let mut clock = self.0.borrow_mut();
            (clock.now, std::mem::take(&mut clock.frames))
        };
        for callback in frames {
            callback(now);
        }
    }

    /// Pumps `count` frames `millis` apart.
    pub fn frames(&self, count: usize, millis: f64) {
        for _ in 0..count {
            self.frame(millis);
        }
    }

    /// Advances the clock, running timers in due order as it passes them.
    pub fn advance(&self, millis: f64) {
        let target = self.0.borrow().now + millis;
        loop {
            let next = {
                let mut clock = self.0.borrow_mut();
                let due = clock
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (at, _, _))| *at <= target)
                    .min_by(|(_, a), (_, b)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                    .map(|(index, _)| index);
                match due {
                    Some(index) => {
                        let (at, _, callback) = clock.timers.remove(index);
                        clock.now = clock.now.max(at);
                        Some(callback)
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> f64 {
        self.0.borrow().now
    }

    fn request_frame(&self, callback: FrameCallback) {
        self.0.borrow_mut().frames.push(callback);
    }

    fn after(&self, millis: u32, callback: TimerCallback) {
        let mut clock = self.0.borrow_mut();
        let at = clock.now + f64::from(millis);
        let seq = clock.next_seq;
        clock.next_seq += 1;
        clock.timers.push((at, seq, callback));
    }
}

/// en-US style grouping, independent of the machine's locale.
pub struct EnglishGrouping;

impl NumberFormat for EnglishGrouping {
    fn format(&self, value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_grouping_in_threes() {
        assert_eq!(EnglishGrouping.format(0), "0");
        assert_eq!(EnglishGrouping.format(999), "999");
        assert_eq!(EnglishGrouping.format(1234), "1,234");
        assert_eq!(EnglishGrouping.format(1234567), "1,234,567");
    }
}
