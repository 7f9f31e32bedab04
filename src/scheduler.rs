use gloo_timers::callback::Timeout;
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub type FrameCallback = Box<dyn FnOnce(f64)>;
pub type TimerCallback = Box<dyn FnOnce()>;

/// Frame and timer scheduling, injected so animations can be driven by a
/// virtual clock in tests.
///
/// Timestamps are milliseconds on the same clock as [`Scheduler::now`].
pub trait Scheduler {
    fn now(&self) -> f64;
    /// Runs `callback` before the next repaint with the frame timestamp.
    fn request_frame(&self, callback: FrameCallback);
    /// Runs `callback` once after `millis` milliseconds.
    fn after(&self, millis: u32, callback: TimerCallback);
}

pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Scheduler for BrowserScheduler {
    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_default()
    }

    fn request_frame(&self, callback: FrameCallback) {
        // once_into_js frees the closure after it has been called
        let callback = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        if let Err(e) = self.window.request_animation_frame(callback.unchecked_ref()) {
            warn!("requestAnimationFrame failed: {:?}", e);
        }
    }

    fn after(&self, millis: u32, callback: TimerCallback) {
        Timeout::new(millis, callback).forget();
    }
}
