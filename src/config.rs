use log::{warn, LevelFilter};
use serde::Deserialize;
use web_sys::Document;

use crate::error::EnhanceError;

/// Id of the optional `<script type="application/json">` block that
/// overrides the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "bloom-config";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub log_level: LogLevel,
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub active_nav: ActiveNavConfig,
    pub cursor: CursorConfig,
    pub particles: ParticleConfig,
    pub newsletter: NewsletterConfig,
    pub navigation: NavigationConfig,
    pub back_to_top: BackToTopConfig,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Tunables shared by everything built on the viewport observer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    pub selector: String,
    pub threshold: f64,
    pub root_margin: String,
    /// Milliseconds per `data-delay` step.
    pub stagger_ms: u32,
    pub class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            stagger_ms: 150,
            class: "active".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CounterConfig {
    pub selector: String,
    pub threshold: f64,
    pub duration_ms: f64,
    /// BCP 47 tag for digit grouping; `"default"` is the browser's locale.
    pub locale: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: ".stat-number".to_string(),
            threshold: 0.5,
            duration_ms: 2000.0,
            locale: "default".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ActiveNavConfig {
    pub section_selector: String,
    pub link_selector: String,
    pub threshold: f64,
    pub root_margin: String,
    pub class: String,
}

impl Default for ActiveNavConfig {
    fn default() -> Self {
        Self {
            section_selector: "section[id]".to_string(),
            link_selector: ".nav-link[href^=\"#\"]".to_string(),
            threshold: 0.3,
            root_margin: "-80px 0px -40% 0px".to_string(),
            class: "active".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorConfig {
    pub hover_selector: String,
    /// Fraction of the remaining distance the ring closes each frame.
    pub smoothing: f64,
    pub dot_size: u32,
    pub dot_hover_size: u32,
    pub ring_size: u32,
    pub ring_hover_size: u32,
    pub ring_color: String,
    pub ring_hover_color: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            hover_selector: "a, button, .lifestyle-card, .gallery-item, .about-card, .feature-card, .testimonial-card".to_string(),
            smoothing: 0.15,
            dot_size: 8,
            dot_hover_size: 12,
            ring_size: 36,
            ring_hover_size: 50,
            ring_color: "rgba(245, 87, 108, 0.3)".to_string(),
            ring_hover_color: "rgba(245, 87, 108, 0.5)".to_string(),
        }
    }
}

/// Half-open `[min, max)` range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Maps `unit` in `[0, 1)` onto the range.
    pub fn sample(&self, unit: f64) -> f64 {
        self.min + unit * (self.max - self.min)
    }

    #[cfg(test)]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// A range as written in the page config; a missing bound keeps the
/// default one.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RangeOverride {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeOverride {
    fn over(self, base: Range) -> Range {
        Range {
            min: self.min.unwrap_or(base.min),
            max: self.max.unwrap_or(base.max),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "ParticleOverrides")]
pub struct ParticleConfig {
    pub container_id: String,
    pub count: usize,
    pub colors: Vec<String>,
    pub size_px: Range,
    pub left_percent: Range,
    pub duration_s: Range,
    pub delay_s: Range,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            container_id: "particles".to_string(),
            count: 20,
            colors: ["#f5576c", "#a18cd1", "#fbc2eb", "#ff9a9e", "#89f7fe", "#ffecd2"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            size_px: Range::new(5.0, 25.0),
            left_percent: Range::new(0.0, 100.0),
            duration_s: Range::new(15.0, 35.0),
            delay_s: Range::new(0.0, 20.0),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParticleOverrides {
    container_id: Option<String>,
    count: Option<usize>,
    colors: Option<Vec<String>>,
    size_px: RangeOverride,
    left_percent: RangeOverride,
    duration_s: RangeOverride,
    delay_s: RangeOverride,
}

impl From<ParticleOverrides> for ParticleConfig {
    fn from(o: ParticleOverrides) -> Self {
        let base = ParticleConfig::default();
        Self {
            container_id: o.container_id.unwrap_or(base.container_id),
            count: o.count.unwrap_or(base.count),
            colors: o.colors.unwrap_or(base.colors),
            size_px: o.size_px.over(base.size_px),
            left_percent: o.left_percent.over(base.left_percent),
            duration_s: o.duration_s.over(base.duration_s),
            delay_s: o.delay_s.over(base.delay_s),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsletterConfig {
    pub form_id: String,
    pub sending_label: String,
    pub success_label: String,
    pub success_background: String,
    pub send_delay_ms: u32,
    pub reset_delay_ms: u32,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            form_id: "newsletterForm".to_string(),
            sending_label: "送信中...".to_string(),
            success_label: "登録完了!".to_string(),
            success_background: "linear-gradient(135deg, #43e97b, #38f9d7)".to_string(),
            send_delay_ms: 1500,
            reset_delay_ms: 3000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    pub nav_id: String,
    pub hamburger_id: String,
    pub links_id: String,
    pub link_selector: String,
    pub scrolled_threshold: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            nav_id: "nav".to_string(),
            hamburger_id: "hamburger".to_string(),
            links_id: "navLinks".to_string(),
            link_selector: ".nav-link".to_string(),
            scrolled_threshold: 50.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BackToTopConfig {
    pub button_id: String,
    pub threshold: f64,
}

impl Default for BackToTopConfig {
    fn default() -> Self {
        Self {
            button_id: "backToTop".to_string(),
            threshold: 600.0,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, EnhanceError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads the page's config block, falling back to defaults when it is
    /// absent or unreadable.
    pub fn from_document(document: &Document) -> Self {
        let Some(text) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Config::default();
        };

        match Config::from_json(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
                Config::default()
            }
        }
    }
}
