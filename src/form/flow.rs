//! What a submit attempt shows the visitor, in order. The DOM side in
//! `form::FormState::run` only carries these steps out.

use crate::config::{SiteConfig, SiteText};

use super::rules::Validity;
use super::submit::{SubmitOutcome, SubmitPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    MailClient,
    Received,
    Failed,
}

impl Notice {
    pub fn text(self, text: &SiteText) -> &str {
        match self {
            Notice::MailClient => &text.mail_client_notice,
            Notice::Received => &text.received_notice,
            Notice::Failed => &text.failed_notice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Empty the status region left over from an earlier attempt.
    ClearStatus,
    EnterLoading,
    NativeSubmit,
    Wait(u32),
    /// Send through the transport; its result decides the steps that follow.
    AwaitTransport,
    LeaveLoading,
    Notify(Notice),
    ResetForm,
    FocusField(usize),
    Announce,
    RemoveAnnouncement,
}

/// Steps for a submit attempt. `first_invalid` is the index of the first
/// field whose stored validity is invalid.
pub fn submit_steps(outcome: SubmitOutcome, first_invalid: Option<usize>, config: &SiteConfig) -> Vec<Step> {
    match outcome {
        SubmitOutcome::Discarded => Vec::new(),
        SubmitOutcome::Invalid => {
            let mut steps = vec![Step::ClearStatus];
            if let Some(index) = first_invalid {
                steps.extend([
                    Step::FocusField(index),
                    Step::Announce,
                    Step::Wait(config.announcement_ms),
                    Step::RemoveAnnouncement,
                ]);
            }
            steps
        }
        SubmitOutcome::Accepted(SubmitPath::MailClient) => vec![
            Step::ClearStatus,
            Step::EnterLoading,
            Step::NativeSubmit,
            Step::Wait(config.mail_client_delay_ms),
            Step::LeaveLoading,
            Step::Notify(Notice::MailClient),
        ],
        SubmitOutcome::Accepted(SubmitPath::Remote) => {
            vec![Step::ClearStatus, Step::EnterLoading, Step::AwaitTransport]
        }
    }
}

/// Steps once the transport has answered. A failure keeps the input.
pub fn transport_steps(delivered: bool) -> Vec<Step> {
    if delivered {
        vec![Step::LeaveLoading, Step::Notify(Notice::Received), Step::ResetForm]
    } else {
        vec![Step::LeaveLoading, Step::Notify(Notice::Failed)]
    }
}

pub fn first_invalid<'a>(validities: impl IntoIterator<Item = &'a Validity>) -> Option<usize> {
    validities
        .into_iter()
        .position(|validity| matches!(validity, Validity::Invalid(_)))
}

/// Loading-related state of the form and its submit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub loading: bool,
    pub disabled: bool,
    pub label: Option<String>,
}

/// Loading state swapped in while a submission is in flight; leaving gives
/// back the state captured on entry.
#[derive(Debug)]
pub struct LoadingSwap {
    idle: ControlState,
}

impl LoadingSwap {
    pub fn enter(idle: ControlState, sending_label: &str) -> (Self, ControlState) {
        let busy = ControlState {
            loading: true,
            disabled: true,
            label: Some(sending_label.to_string()),
        };
        (Self { idle }, busy)
    }

    pub fn leave(self) -> ControlState {
        self.idle
    }
}

/// How a field and its group present a validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFeedback<'a> {
    /// `None` removes the attribute.
    pub aria_invalid: Option<&'static str>,
    pub message: &'a str,
    pub show_message: bool,
    pub error: bool,
    pub success: bool,
}

impl<'a> FieldFeedback<'a> {
    pub fn for_validity(validity: &'a Validity, has_content: bool) -> Self {
        match validity {
            Validity::Unvalidated => Self {
                aria_invalid: None,
                message: "",
                show_message: false,
                error: false,
                success: false,
            },
            Validity::Valid => Self {
                aria_invalid: Some("false"),
                message: "",
                show_message: false,
                error: false,
                success: has_content,
            },
            Validity::Invalid(message) => Self {
                aria_invalid: Some("true"),
                message,
                show_message: true,
                error: true,
                success: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(steps: &[Step], step: Step) -> usize {
        steps
            .iter()
            .position(|s| *s == step)
            .unwrap_or_else(|| panic!("{:?} missing from {:?}", step, steps))
    }

    fn waited_before(steps: &[Step], index: usize) -> u32 {
        steps[..index]
            .iter()
            .map(|step| match step {
                Step::Wait(ms) => *ms,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn mail_client_happy_path() {
        let config = SiteConfig::default();
        let steps = submit_steps(SubmitOutcome::Accepted(SubmitPath::MailClient), None, &config);

        let loading = position(&steps, Step::EnterLoading);
        let submitted = position(&steps, Step::NativeSubmit);
        let restored = position(&steps, Step::LeaveLoading);
        let notified = position(&steps, Step::Notify(Notice::MailClient));

        assert!(loading < submitted);
        assert!(submitted < restored);
        assert!(waited_before(&steps, restored) >= 1_000);
        assert!(restored < notified);
        assert!(!steps.contains(&Step::ResetForm));
    }

    #[test]
    fn honeypot_submission_shows_nothing() {
        let config = SiteConfig::default();
        assert!(submit_steps(SubmitOutcome::Discarded, Some(0), &config).is_empty());
    }

    #[test]
    fn every_visible_attempt_clears_the_old_status_first() {
        let config = SiteConfig::default();
        for outcome in [
            SubmitOutcome::Invalid,
            SubmitOutcome::Accepted(SubmitPath::MailClient),
            SubmitOutcome::Accepted(SubmitPath::Remote),
        ] {
            let steps = submit_steps(outcome, Some(1), &config);
            assert_eq!(steps.first(), Some(&Step::ClearStatus), "{:?}", outcome);
        }
    }

    #[test]
    fn invalid_submit_focuses_then_announces_for_a_second() {
        let config = SiteConfig::default();
        let steps = submit_steps(SubmitOutcome::Invalid, Some(2), &config);
        assert_eq!(
            steps,
            vec![
                Step::ClearStatus,
                Step::FocusField(2),
                Step::Announce,
                Step::Wait(1_000),
                Step::RemoveAnnouncement,
            ]
        );
        assert!(!steps.contains(&Step::EnterLoading));
    }

    #[test]
    fn remote_outcome_decides_the_ending() {
        let config = SiteConfig::default();
        let steps = submit_steps(SubmitOutcome::Accepted(SubmitPath::Remote), None, &config);
        assert_eq!(steps.last(), Some(&Step::AwaitTransport));
        assert!(position(&steps, Step::EnterLoading) < position(&steps, Step::AwaitTransport));

        assert_eq!(
            transport_steps(true),
            vec![Step::LeaveLoading, Step::Notify(Notice::Received), Step::ResetForm]
        );
        assert_eq!(transport_steps(false), vec![Step::LeaveLoading, Step::Notify(Notice::Failed)]);
    }

    #[test]
    fn first_invalid_follows_field_order() {
        let fields = vec![
            Validity::Valid,
            Validity::Unvalidated,
            Validity::Invalid("b".into()),
            Validity::Invalid("a".into()),
        ];
        assert_eq!(first_invalid(&fields), Some(2));
        assert_eq!(first_invalid(&[Validity::Valid, Validity::Unvalidated]), None);
    }

    #[test]
    fn loading_swap_restores_the_control() {
        let idle = ControlState {
            loading: false,
            disabled: false,
            label: Some("送信する".to_string()),
        };
        let (swap, busy) = LoadingSwap::enter(idle.clone(), "送信中...");
        assert_eq!(
            busy,
            ControlState {
                loading: true,
                disabled: true,
                label: Some("送信中...".to_string()),
            }
        );
        assert_eq!(swap.leave(), idle);
    }

    #[test]
    fn feedback_toggles_error_and_success() {
        let invalid = Validity::Invalid("必須です".into());
        let feedback = FieldFeedback::for_validity(&invalid, true);
        assert_eq!(feedback.aria_invalid, Some("true"));
        assert_eq!(feedback.message, "必須です");
        assert!(feedback.show_message && feedback.error && !feedback.success);

        let valid = Validity::Valid;
        let filled = FieldFeedback::for_validity(&valid, true);
        assert_eq!(filled.aria_invalid, Some("false"));
        assert!(filled.success && !filled.error && !filled.show_message);
        assert_eq!(filled.message, "");
        assert!(!FieldFeedback::for_validity(&valid, false).success);
    }

    #[test]
    fn unvalidated_feedback_clears_everything() {
        let feedback = FieldFeedback::for_validity(&Validity::Unvalidated, true);
        assert_eq!(feedback.aria_invalid, None);
        assert!(!feedback.error && !feedback.success && !feedback.show_message);
    }

    #[test]
    fn notices_use_site_text() {
        let text = SiteText::default();
        assert_eq!(Notice::Received.text(&text), text.received_notice);
        assert_eq!(Notice::Failed.text(&text), text.failed_notice);
        assert_eq!(Notice::MailClient.text(&text), text.mail_client_notice);
    }
}
