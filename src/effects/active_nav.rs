use log::debug;
use web_sys::Document;

use crate::config::ActiveNavConfig;
use crate::dom::{self, PageElement};
use crate::error::EnhanceError;
use crate::observer::{Entry, ObserverOptions, Subscriptions, ViewportObserver};

/// Highlights the nav link of the section currently in the trigger band.
///
/// Never unsubscribes. When one batch holds several intersecting sections,
/// they are applied in order and the last one wins.
pub struct ActiveSectionTracker<E> {
    links: Vec<(E, String)>,
    class: String,
}

impl<E: PageElement> ActiveSectionTracker<E> {
    pub fn new(links: Vec<E>, config: &ActiveNavConfig) -> Self {
        let links = links
            .into_iter()
            .map(|link| {
                let href = link.attr("href").unwrap_or_default();
                (link, href)
            })
            .collect();
        Self {
            links,
            class: config.class.clone(),
        }
    }

    pub fn handle(&self, entries: Vec<Entry<E>>) {
        for entry in entries.into_iter().filter(|e| e.is_intersecting) {
            let Some(id) = entry.target.attr("id") else {
                continue;
            };
            self.activate(&id);
        }
    }

    /// Marks the link pointing at `#section_id`, clears every other one.
    pub fn activate(&self, section_id: &str) {
        let wanted = format!("#{}", section_id);
        for (link, href) in &self.links {
            link.set_class(&self.class, *href == wanted);
        }
    }

    #[cfg(test)]
    pub fn active(&self) -> Vec<&E> {
        self.links
            .iter()
            .filter(|(link, _)| link.has_class(&self.class))
            .map(|(link, _)| link)
            .collect()
    }
}

pub fn install(document: &Document, config: &ActiveNavConfig) -> Result<(), EnhanceError> {
    let sections = dom::query_all(document, &config.section_selector)?;
    if sections.is_empty() {
        return Err(EnhanceError::missing(config.section_selector.as_str()));
    }
    let links = dom::query_all(document, &config.link_selector)?;
    if links.is_empty() {
        return Err(EnhanceError::missing(config.link_selector.as_str()));
    }

    debug!("Tracking {} sections for {} nav links", sections.len(), links.len());
    let tracker = ActiveSectionTracker::new(links, config);
    let observer = ViewportObserver::new(
        &ObserverOptions::new(config.threshold, config.root_margin.as_str()),
        move |entries, _| tracker.handle(entries),
    );
    if observer.is_inert() {
        return Err(EnhanceError::Unsupported("IntersectionObserver"));
    }
    // never ended: the tracker follows every section for the page's life
    Subscriptions::new(sections).attach(&observer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeElement;

    fn page() -> (Vec<FakeElement>, Vec<FakeElement>, ActiveSectionTracker<FakeElement>) {
        let sections: Vec<FakeElement> = ["about", "gallery", "contact"]
            .iter()
            .map(|id| FakeElement::new().with_attr("id", id))
            .collect();
        let links: Vec<FakeElement> = ["#about", "#gallery", "#contact"]
            .iter()
            .map(|href| FakeElement::new().with_attr("href", href))
            .collect();
        let tracker = ActiveSectionTracker::new(links.clone(), &ActiveNavConfig::default());
        (sections, links, tracker)
    }

    #[test]
    fn marks_only_the_matching_link() {
        let (sections, links, tracker) = page();

        tracker.handle(vec![sections[1].entry(true)]);
        assert_eq!(tracker.active(), vec![&links[1]]);

        tracker.handle(vec![sections[0].entry(true)]);
        assert_eq!(tracker.active(), vec![&links[0]]);
    }

    #[test]
    fn leaving_sections_do_not_clear_the_marker() {
        let (sections, links, tracker) = page();

        tracker.handle(vec![sections[2].entry(true)]);
        tracker.handle(vec![sections[2].entry(false)]);
        assert_eq!(tracker.active(), vec![&links[2]]);
    }

    #[test]
    fn last_intersecting_entry_in_a_batch_wins() {
        let (sections, links, tracker) = page();

        tracker.handle(vec![
            sections[0].entry(true),
            sections[2].entry(true),
            sections[1].entry(false),
        ]);
        assert_eq!(tracker.active(), vec![&links[2]]);
    }

    #[test]
    fn at_most_one_link_is_ever_active() {
        let (sections, _, tracker) = page();
        let batches = [[0, 1], [2, 0], [1, 1], [2, 2]];

        for batch in batches {
            tracker.handle(batch.iter().map(|&i| sections[i].entry(true)).collect());
            assert_eq!(tracker.active().len(), 1);
        }
    }

    #[test]
    fn unknown_section_clears_all_links() {
        let (_, _, tracker) = page();
        let stray = FakeElement::new().with_attr("id", "footer");

        tracker.activate("about");
        tracker.handle(vec![stray.entry(true)]);
        assert!(tracker.active().is_empty());
    }
}
