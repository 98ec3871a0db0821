use log::Level;
use serde::Deserialize;
use web_sys::Document;

use crate::error::SiteError;

/// Id of the optional `<script type="application/json">` block that
/// overrides the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub reveal_threshold: f64,
    pub countup_threshold: f64,
    pub stagger_step_ms: u32,
    pub countup_duration_ms: u32,
    pub desktop_breakpoint_px: f64,
    pub scroll_margin_px: f64,
    pub debounce_ms: u32,
    pub mail_client_delay_ms: u32,
    pub remote_delay_ms: u32,
    pub remote_timeout_ms: u32,
    pub announcement_ms: u32,
    pub text: SiteText,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.15,
            countup_threshold: 0.3,
            stagger_step_ms: 90,
            countup_duration_ms: 700,
            desktop_breakpoint_px: 768.0,
            scroll_margin_px: 20.0,
            debounce_ms: 300,
            mail_client_delay_ms: 1_000,
            remote_delay_ms: 2_000,
            remote_timeout_ms: 10_000,
            announcement_ms: 1_000,
            text: SiteText::default(),
        }
    }
}

/// User-facing copy. Defaults are the site's Japanese strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteText {
    pub menu_open_label: String,
    pub menu_close_label: String,
    pub sending_label: String,
    pub mail_client_notice: String,
    pub received_notice: String,
    pub failed_notice: String,
    pub invalid_form_announcement: String,
}

impl Default for SiteText {
    fn default() -> Self {
        Self {
            menu_open_label: "メニューを開く".to_string(),
            menu_close_label: "メニューを閉じる".to_string(),
            sending_label: "送信中...".to_string(),
            mail_client_notice: "メールソフトが起動します。送信を完了してください。".to_string(),
            received_notice: "お問い合わせを受け付けました。ありがとうございます。".to_string(),
            failed_notice: "送信に失敗しました。時間をおいて再度お試しください。".to_string(),
            invalid_form_announcement:
                "入力内容にエラーがあります。修正してから再度送信してください。".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, SiteError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the page's config block, falling back to defaults when the block
    /// is absent or malformed.
    pub fn load(document: &Document) -> Self {
        let raw = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());
        match raw {
            Some(raw) => Self::from_json(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring site config: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let config = SiteConfig::from_json(
            r#"{ "stagger_step_ms": 120, "text": { "sending_label": "Sending..." } }"#,
        )
        .unwrap();

        assert_eq!(config.stagger_step_ms, 120);
        assert_eq!(config.text.sending_label, "Sending...");
        assert_eq!(config.countup_duration_ms, 700);
        assert_eq!(config.text.menu_open_label, "メニューを開く");
    }

    #[test]
    fn empty_block_is_default() {
        assert_eq!(SiteConfig::from_json("  \n").unwrap(), SiteConfig::default());
    }

    #[test]
    fn malformed_block_is_an_error() {
        let err = SiteConfig::from_json("{ stagger_step_ms: }").unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }
}
