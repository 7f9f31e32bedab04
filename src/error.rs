use thiserror::Error;
use wasm_bindgen::JsValue;

/// Why a page enhancement did not install.
///
/// None of these are fatal: the page is fully usable without any
/// enhancement, so callers report them and move on.
#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("no element matches `{0}`")]
    Missing(String),
    #[error("browser has no {0}")]
    Unsupported(&'static str),
    #[error("browser call failed: {0}")]
    Js(String),
    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),
}

impl EnhanceError {
    pub fn missing(selector: impl Into<String>) -> Self {
        EnhanceError::Missing(selector.into())
    }
}

impl From<JsValue> for EnhanceError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        EnhanceError::Js(message)
    }
}
