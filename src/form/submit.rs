use futures::future::{self, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde_json::{Map, Value};

use crate::config::SiteConfig;
use crate::error::SiteError;

/// Name of the hidden anti-spam field.
pub const HONEYPOT_FIELD: &str = "website";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPath {
    /// `mailto:` action; the browser hands the form to the mail client.
    MailClient,
    /// Anything else; the form goes through a [`SubmitTransport`].
    Remote,
}

impl SubmitPath {
    pub fn for_action(action: &str) -> Self {
        let action = action.trim_start();
        let is_mailto = action
            .get(..7)
            .map_or(false, |scheme| scheme.eq_ignore_ascii_case("mailto:"));
        if is_mailto {
            SubmitPath::MailClient
        } else {
            SubmitPath::Remote
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Honeypot filled; dropped without any feedback.
    Discarded,
    Invalid,
    Accepted(SubmitPath),
}

/// Decides what a submit attempt does. `validate` runs only when the honeypot
/// is empty, so a bot submission never touches the visible form state.
pub fn plan_submission<F>(honeypot: Option<&str>, validate: F, action: &str) -> SubmitOutcome
where
    F: FnOnce() -> bool,
{
    if honeypot.map_or(false, |value| !value.is_empty()) {
        return SubmitOutcome::Discarded;
    }
    if !validate() {
        return SubmitOutcome::Invalid;
    }
    SubmitOutcome::Accepted(SubmitPath::for_action(action))
}

/// How a remote submission reaches its backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitTransport {
    /// No request; succeeds after a fixed delay.
    Simulated { delay_ms: u32 },
    /// JSON POST to `endpoint`, failing after `timeout_ms`.
    Http { endpoint: String, timeout_ms: u32 },
}

impl SubmitTransport {
    /// Transport for a form whose `data-transport` attribute is `kind`.
    pub fn select(kind: Option<&str>, endpoint: &str, config: &SiteConfig) -> Self {
        match kind.map(str::trim) {
            Some(kind) if kind.eq_ignore_ascii_case("http") => SubmitTransport::Http {
                endpoint: endpoint.to_string(),
                timeout_ms: config.remote_timeout_ms,
            },
            _ => SubmitTransport::Simulated {
                delay_ms: config.remote_delay_ms,
            },
        }
    }

    pub async fn send(&self, fields: &[(String, String)]) -> Result<(), SiteError> {
        match self {
            SubmitTransport::Simulated { delay_ms } => {
                TimeoutFuture::new(*delay_ms).await;
                Ok(())
            }
            SubmitTransport::Http { endpoint, timeout_ms } => {
                let request = Request::post(endpoint)
                    .header("Accept", "application/json")
                    .json(&payload(fields))?;
                let response = Box::pin(request.send());
                let deadline = Box::pin(TimeoutFuture::new(*timeout_ms));
                match future::select(response, deadline).await {
                    Either::Left((Ok(response), _)) if response.ok() => Ok(()),
                    Either::Left((Ok(response), _)) => Err(SiteError::Transport(format!(
                        "{} responded with status {}",
                        endpoint,
                        response.status()
                    ))),
                    Either::Left((Err(e), _)) => Err(e.into()),
                    Either::Right(_) => Err(SiteError::Timeout(*timeout_ms)),
                }
            }
        }
    }
}

/// JSON object of the submitted fields. A repeated name keeps its last value.
pub fn payload(fields: &[(String, String)]) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn filled_honeypot_discards_without_validating() {
        let validated = Cell::new(false);
        let outcome = plan_submission(
            Some("http://spam.example"),
            || {
                validated.set(true);
                true
            },
            "mailto:info@example.co.jp",
        );
        assert_eq!(outcome, SubmitOutcome::Discarded);
        assert!(!validated.get());
    }

    #[test]
    fn whitespace_in_honeypot_still_counts() {
        assert_eq!(plan_submission(Some(" "), || true, ""), SubmitOutcome::Discarded);
    }

    #[test]
    fn empty_or_missing_honeypot_goes_to_validation() {
        assert_eq!(plan_submission(Some(""), || false, ""), SubmitOutcome::Invalid);
        assert_eq!(plan_submission(None, || false, ""), SubmitOutcome::Invalid);
    }

    #[test]
    fn valid_form_picks_path_from_action() {
        assert_eq!(
            plan_submission(None, || true, "mailto:info@example.co.jp"),
            SubmitOutcome::Accepted(SubmitPath::MailClient)
        );
        assert_eq!(
            plan_submission(Some(""), || true, "https://formspree.io/f/abc"),
            SubmitOutcome::Accepted(SubmitPath::Remote)
        );
    }

    #[test]
    fn mailto_detection() {
        assert_eq!(SubmitPath::for_action("MAILTO:a@b.co"), SubmitPath::MailClient);
        assert_eq!(SubmitPath::for_action("  mailto:a@b.co"), SubmitPath::MailClient);
        assert_eq!(SubmitPath::for_action("mail"), SubmitPath::Remote);
        assert_eq!(SubmitPath::for_action("/contact"), SubmitPath::Remote);
    }

    #[test]
    fn transport_defaults_to_simulation() {
        let config = SiteConfig::default();
        assert_eq!(
            SubmitTransport::select(None, "/contact", &config),
            SubmitTransport::Simulated { delay_ms: 2_000 }
        );
        assert_eq!(
            SubmitTransport::select(Some("carrier-pigeon"), "/contact", &config),
            SubmitTransport::Simulated { delay_ms: 2_000 }
        );
        assert_eq!(
            SubmitTransport::select(Some("HTTP"), "https://formspree.io/f/abc", &config),
            SubmitTransport::Http {
                endpoint: "https://formspree.io/f/abc".to_string(),
                timeout_ms: 10_000,
            }
        );
    }

    #[test]
    fn payload_is_a_flat_object() {
        let fields = vec![
            ("name".to_string(), "山田 太郎".to_string()),
            ("email".to_string(), "a@b.co".to_string()),
        ];
        assert_eq!(
            payload(&fields),
            serde_json::json!({ "name": "山田 太郎", "email": "a@b.co" })
        );
    }
}
