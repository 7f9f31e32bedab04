use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event};

use crate::config::NewsletterConfig;
use crate::dom::{self, PageElement};
use crate::error::EnhanceError;
use crate::scheduler::Scheduler;

/// Pretend sign-up: nothing leaves the page.
///
/// sending (button disabled) → success (input cleared) → original label.
pub struct Newsletter<E> {
    input: E,
    button: E,
    scheduler: Rc<dyn Scheduler>,
    config: NewsletterConfig,
}

impl<E: PageElement> Newsletter<E> {
    pub fn new(input: E, button: E, scheduler: Rc<dyn Scheduler>, config: &NewsletterConfig) -> Self {
        Self {
            input,
            button,
            scheduler,
            config: config.clone(),
        }
    }

    pub fn submit(self: &Rc<Self>) {
        let original = self.button.text();
        self.button.set_text(&self.config.sending_label);
        self.button.set_disabled(true);

        let this = Rc::clone(self);
        self.scheduler.after(
            self.config.send_delay_ms,
            Box::new(move || this.succeed(original)),
        );
    }

    fn succeed(self: Rc<Self>, original: String) {
        self.button.set_text(&self.config.success_label);
        self.button.set_style("background", &self.config.success_background);
        self.input.set_value("");

        let scheduler = self.scheduler.clone();
        scheduler.after(
            self.config.reset_delay_ms,
            Box::new(move || self.reset(&original)),
        );
    }

    fn reset(&self, original: &str) {
        self.button.set_text(original);
        self.button.set_style("background", "");
        self.button.set_disabled(false);
    }
}

pub fn install(
    document: &Document,
    scheduler: Rc<dyn Scheduler>,
    config: &NewsletterConfig,
) -> Result<(), EnhanceError> {
    let form = dom::by_id(document, &config.form_id)?;
    let input = dom::query(&form, "input")?;
    let button = dom::query(&form, "button")?;
    let newsletter = Rc::new(Newsletter::new(input, button, scheduler, config));

    let on_submit = Closure::wrap(Box::new(move |e: Event| {
        e.prevent_default();
        newsletter.submit();
    }) as Box<dyn FnMut(Event)>);
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();

    debug!("Newsletter form #{} ready", config.form_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeElement, ManualScheduler};

    #[test]
    fn submit_runs_sending_success_reset() {
        let clock = ManualScheduler::new();
        let input = FakeElement::new().with_value("hana@example.com");
        let button = FakeElement::new().with_text("登録する");
        let config = NewsletterConfig::default();
        let newsletter = Rc::new(Newsletter::new(
            input.clone(),
            button.clone(),
            Rc::new(clock.clone()),
            &config,
        ));

        newsletter.submit();
        assert_eq!(button.text(), "送信中...");
        assert!(button.disabled());
        assert_eq!(input.value(), "hana@example.com");

        clock.advance(1499.0);
        assert_eq!(button.text(), "送信中...");
        clock.advance(1.0);
        assert_eq!(button.text(), "登録完了!");
        assert_eq!(input.value(), "");
        assert_eq!(button.style("background").as_deref(), Some(config.success_background.as_str()));
        assert!(button.disabled());

        clock.advance(2999.0);
        assert_eq!(button.text(), "登録完了!");
        clock.advance(1.0);
        assert_eq!(button.text(), "登録する");
        assert!(!button.disabled());
        assert_eq!(button.style("background"), None);
        assert_eq!(clock.pending_timers(), 0);
    }
}
