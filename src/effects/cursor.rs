use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent};

use crate::config::CursorConfig;
use crate::dom::{self, PageElement};
use crate::error::EnhanceError;
use crate::scheduler::Scheduler;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[cfg(test)]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Where the pointer is and where the trailing ring has got to.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub leading: Point,
    pub trailing: Point,
}

impl PointerState {
    /// Closes `factor` of the remaining gap. Never lands exactly; after n
    /// steps on a still target the gap is `(1 - factor)^n` of what it was.
    pub fn step(&mut self, factor: f64) {
        self.trailing.x += (self.leading.x - self.trailing.x) * factor;
        self.trailing.y += (self.leading.y - self.trailing.y) * factor;
    }
}

/// A dot pinned to the pointer plus a ring easing after it.
pub struct CursorFollower<E> {
    dot: E,
    ring: E,
    state: RefCell<PointerState>,
    config: CursorConfig,
}

impl<E: PageElement> CursorFollower<E> {
    pub fn new(dot: E, ring: E, config: &CursorConfig) -> Self {
        Self {
            dot,
            ring,
            state: RefCell::new(PointerState::default()),
            config: config.clone(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PointerState {
        *self.state.borrow()
    }

    /// Moves the dot straight to the pointer; the ring catches up per frame.
    pub fn pointer_moved(&self, at: Point) {
        self.state.borrow_mut().leading = at;
        place(&self.dot, at);
    }

    pub fn tick(&self) {
        let trailing = {
            let mut state = self.state.borrow_mut();
            state.step(self.config.smoothing);
            state.trailing
        };
        place(&self.ring, trailing);
    }

    pub fn set_hover(&self, hovered: bool) {
        let c = &self.config;
        let (dot, ring, color) = if hovered {
            (c.dot_hover_size, c.ring_hover_size, &c.ring_hover_color)
        } else {
            (c.dot_size, c.ring_size, &c.ring_color)
        };
        size(&self.dot, dot);
        size(&self.ring, ring);
        self.ring.set_style("border-color", color);
    }
}

impl<E: PageElement> CursorFollower<E> {
    /// Ticks every frame for the life of the page.
    pub fn run(self: Rc<Self>, scheduler: Rc<dyn Scheduler>) {
        self.tick();
        let next = scheduler.clone();
        scheduler.request_frame(Box::new(move |_: f64| self.run(next)));
    }
}

fn place<E: PageElement>(el: &E, at: Point) {
    el.set_style("left", &format!("{}px", at.x));
    el.set_style("top", &format!("{}px", at.y));
}

fn size<E: PageElement>(el: &E, px: u32) {
    let px = format!("{}px", px);
    el.set_style("width", &px);
    el.set_style("height", &px);
}

fn indicator(document: &Document, body: &Element, class: &str) -> Result<Element, EnhanceError> {
    let el = document.create_element("div")?;
    el.add_class(class);
    body.append_child(&el)?;
    Ok(el)
}

pub fn install(
    document: &Document,
    scheduler: Rc<dyn Scheduler>,
    config: &CursorConfig,
) -> Result<(), EnhanceError> {
    let body = dom::body(document)?;
    let dot = indicator(document, &body, "cursor-dot")?;
    let ring = indicator(document, &body, "cursor-ring")?;
    let follower = Rc::new(CursorFollower::new(dot, ring, config));

    {
        let follower = follower.clone();
        let on_move = Closure::wrap(Box::new(move |e: MouseEvent| {
            follower.pointer_moved(Point::new(f64::from(e.client_x()), f64::from(e.client_y())));
        }) as Box<dyn FnMut(MouseEvent)>);
        document.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        on_move.forget();
    }

    let targets = dom::query_all(document, &config.hover_selector)?;
    for target in &targets {
        for (event, hovered) in [("mouseenter", true), ("mouseleave", false)] {
            let follower = follower.clone();
            let callback = Closure::wrap(Box::new(move || {
                follower.set_hover(hovered);
            }) as Box<dyn FnMut()>);
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
            callback.forget();
        }
    }

    follower.run(scheduler);
    debug!("Custom cursor on, {} hover targets", targets.len());
    Ok(())
}
