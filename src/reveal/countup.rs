use crate::dom::parse_int_prefix;

/// Linear count from zero to `target` over `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUp {
    pub target: i64,
    pub duration_ms: u32,
}

impl CountUp {
    pub fn new(target: i64, duration_ms: u32) -> Self {
        Self { target, duration_ms }
    }

    /// Target read from `data-target`, falling back to the element's text.
    /// Anything that is not an integer counts to zero.
    pub fn parse_target(data_target: Option<&str>, text: Option<&str>) -> i64 {
        data_target
            .filter(|raw| !raw.is_empty())
            .or(text)
            .and_then(parse_int_prefix)
            .unwrap_or(0)
    }

    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (elapsed_ms / f64::from(self.duration_ms)).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, elapsed_ms: f64) -> i64 {
        let p = self.progress(elapsed_ms);
        if p >= 1.0 {
            return self.target;
        }
        (self.target as f64 * p).floor() as i64
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.progress(elapsed_ms) >= 1.0
    }
}

/// Displayed form of a count value: at least two characters, zero padded.
pub fn format_count(value: i64) -> String {
    format!("{:02}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reaches_target_exactly_at_duration() {
        let count = CountUp::new(42, 700);
        assert_eq!(count.value_at(0.0), 0);
        assert_eq!(count.value_at(350.0), 21);
        assert_eq!(count.value_at(700.0), 42);
        assert_eq!(count.value_at(1_500.0), 42);
        assert!(count.is_finished(700.0));
        assert!(!count.is_finished(699.9));
    }

    #[test]
    fn values_are_floored() {
        let count = CountUp::new(10, 700);
        // 10 * 0.0999 = 0.999
        assert_eq!(count.value_at(69.93), 0);
        assert_eq!(count.value_at(70.0), 1);
    }

    #[test]
    fn display_is_two_digits_at_least() {
        assert_eq!(format_count(0), "00");
        assert_eq!(format_count(5), "05");
        assert_eq!(format_count(42), "42");
        assert_eq!(format_count(1200), "1200");
        assert_eq!(format_count(-5), "-5");
    }

    #[test]
    fn target_comes_from_override_then_text() {
        assert_eq!(CountUp::parse_target(Some("120"), Some("0")), 120);
        assert_eq!(CountUp::parse_target(None, Some("35+")), 35);
        assert_eq!(CountUp::parse_target(Some(""), Some("8")), 8);
    }

    #[test]
    fn bad_target_counts_to_zero() {
        assert_eq!(CountUp::parse_target(Some("many"), Some("12")), 0);
        assert_eq!(CountUp::parse_target(None, Some("—")), 0);
        assert_eq!(CountUp::parse_target(None, None), 0);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let count = CountUp::new(7, 0);
        assert_eq!(count.value_at(0.0), 7);
    }

    proptest! {
        #[test]
        fn display_never_decreases(target in 0i64..100_000, a in 0.0f64..2_000.0, b in 0.0f64..2_000.0) {
            let count = CountUp::new(target, 700);
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(count.value_at(early) <= count.value_at(late));
        }

        #[test]
        fn padded_width_is_at_least_two(value in 0i64..1_000_000) {
            prop_assert!(format_count(value).len() >= 2);
        }
    }
}
