use crate::dom::parse_int_prefix;

/// Explicit per-element delay from a `data-delay` value.
/// Unparsable or negative values count as no override.
pub fn explicit_delay(raw: Option<&str>) -> Option<u32> {
    raw.and_then(parse_int_prefix)
        .and_then(|ms| u32::try_from(ms).ok())
}

/// Transition delay in milliseconds for a revealable element.
///
/// `group_index` is the element's zero-based position among the `.reveal`
/// members of its stagger group, `None` when it is not in a group. An
/// explicit override always wins; ungrouped elements without one get `None`,
/// leaving the stylesheet's delay in place.
pub fn transition_delay(explicit: Option<u32>, group_index: Option<usize>, step_ms: u32) -> Option<u32> {
    explicit.or_else(|| {
        group_index.map(|index| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            index.saturating_mul(step_ms)
        })
    })
}

pub fn css_delay(ms: u32) -> String {
    format!("{}ms", ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn group_members_step_by_index() {
        let delays: Vec<_> = (0..4).map(|i| transition_delay(None, Some(i), 90)).collect();
        assert_eq!(delays, vec![Some(0), Some(90), Some(180), Some(270)]);
    }

    #[test]
    fn override_beats_position() {
        assert_eq!(transition_delay(Some(400), Some(3), 90), Some(400));
        assert_eq!(transition_delay(Some(0), Some(5), 90), Some(0));
    }

    #[test]
    fn ungrouped_without_override_is_untouched() {
        assert_eq!(transition_delay(None, None, 90), None);
        assert_eq!(transition_delay(Some(150), None, 90), Some(150));
    }

    #[test]
    fn override_parsing() {
        assert_eq!(explicit_delay(Some("200")), Some(200));
        assert_eq!(explicit_delay(Some("200ms")), Some(200));
        assert_eq!(explicit_delay(Some("soon")), None);
        assert_eq!(explicit_delay(Some("-50")), None);
        assert_eq!(explicit_delay(None), None);
        assert_eq!(css_delay(180), "180ms");
    }

    #[test]
    fn rejected_override_falls_back_to_index() {
        assert_eq!(transition_delay(explicit_delay(Some("abc")), Some(2), 90), Some(180));
        assert_eq!(transition_delay(explicit_delay(Some("-50")), Some(1), 90), Some(90));
    }

    proptest! {
        #[test]
        fn stagger_is_index_times_step(index in 0usize..10_000) {
            prop_assert_eq!(transition_delay(None, Some(index), 90), Some(index as u32 * 90));
        }

        #[test]
        fn override_is_position_independent(ms in 0u32..100_000, index in proptest::option::of(0usize..500)) {
            prop_assert_eq!(transition_delay(Some(ms), index, 90), Some(ms));
        }
    }
}
