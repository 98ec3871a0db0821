use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("submission failed: {0}")]
    Transport(String),
    #[error("submission timed out after {0}ms")]
    Timeout(u32),
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        SiteError::Js(message)
    }
}

impl From<gloo_net::Error> for SiteError {
    fn from(err: gloo_net::Error) -> Self {
        SiteError::Transport(err.to_string())
    }
}
