use log::debug;
use web_sys::js_sys::Math;
use web_sys::Document;

use crate::config::ParticleConfig;
use crate::dom::{self, PageElement};
use crate::error::EnhanceError;

/// One floating decoration. Generated once, never updated.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub size_px: f64,
    pub color: String,
    pub left_percent: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Particle {
    fn apply<E: PageElement>(&self, el: &E) {
        el.add_class("particle");
        el.set_style("width", &format!("{}px", self.size_px));
        el.set_style("height", &format!("{}px", self.size_px));
        el.set_style("background", &self.color);
        el.set_style("left", &format!("{}%", self.left_percent));
        el.set_style("animation-duration", &format!("{}s", self.duration_s));
        el.set_style("animation-delay", &format!("{}s", self.delay_s));
    }
}

/// `random` yields values in `[0, 1)`, like `Math.random`.
pub fn generate(config: &ParticleConfig, mut random: impl FnMut() -> f64) -> Vec<Particle> {
    (0..config.count)
        .map(|_| {
            let size_px = config.size_px.sample(random());
            let color = pick(&config.colors, random());
            Particle {
                size_px,
                color,
                left_percent: config.left_percent.sample(random()),
                duration_s: config.duration_s.sample(random()),
                delay_s: config.delay_s.sample(random()),
            }
        })
        .collect()
}

fn pick(colors: &[String], unit: f64) -> String {
    if colors.is_empty() {
        return String::new();
    }
    let index = ((unit * colors.len() as f64).floor() as usize).min(colors.len() - 1);
    colors[index].clone()
}

pub fn install(document: &Document, config: &ParticleConfig) -> Result<(), EnhanceError> {
    let container = dom::by_id(document, &config.container_id)?;
    let particles = generate(config, Math::random);
    for particle in &particles {
        let el = document.create_element("div")?;
        particle.apply(&el);
        container.append_child(&el)?;
    }
    debug!("Added {} particles", particles.len());
    Ok(())
}
