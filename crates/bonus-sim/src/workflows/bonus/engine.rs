//! Interpolation engine mapping an achievement ratio onto a scale row.
//!
//! The same lookup drives KPI/goal scoring (against [`ScaleRow::performance`])
//! and payout multiples (against a role or global-factor row).

use serde::{Deserialize, Serialize};

use super::domain::{ScaleRow, ThresholdTable};

/// How a ratio between two triggers is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationPolicy {
    /// Piecewise-linear between trigger points, flat above Exceeded.
    #[default]
    Linear,
    /// Value of the highest trigger met, never interpolated.
    Step,
}

impl InterpolationPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Step => "step",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear" | "interpolate" | "interpolation" => Some(Self::Linear),
            "step" | "floor" | "discrete" => Some(Self::Step),
            _ => None,
        }
    }
}

/// `actual / target`, or 0 when the target is not positive.
pub fn achievement_ratio(actual: f64, target: f64) -> f64 {
    if target > 0.0 {
        actual / target
    } else {
        0.0
    }
}

/// Resolve `ratio` against the threshold table and scale row.
///
/// Returns exactly 0.0 below the Minimum trigger and whenever the threshold
/// table cannot be resolved into four increasing control points.
pub fn compute_coefficient(
    ratio: f64,
    thresholds: &ThresholdTable,
    scale: &ScaleRow,
    policy: InterpolationPolicy,
) -> f64 {
    let Some(triggers) = thresholds.control_points() else {
        return 0.0;
    };

    if ratio.is_nan() || ratio < triggers[0] {
        return 0.0;
    }

    let values = scale.values();
    let band = triggers
        .iter()
        .rposition(|trigger| ratio >= *trigger)
        .unwrap_or(0);

    match policy {
        InterpolationPolicy::Step => values[band],
        InterpolationPolicy::Linear => {
            if band + 1 == triggers.len() {
                return values[band];
            }

            let (lower, upper) = (triggers[band], triggers[band + 1]);
            let position = (ratio - lower) / (upper - lower);
            values[band] + position * (values[band + 1] - values[band])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::bonus::domain::{Threshold, ThresholdLevel};

    fn tactical() -> ScaleRow {
        ScaleRow::role("Tático", [2.0, 4.0, 8.0, 9.0])
    }

    #[test]
    fn below_minimum_pays_nothing_under_every_policy() {
        let thresholds = ThresholdTable::standard();
        for ratio in [0.0, 0.5, 0.8999] {
            for policy in [InterpolationPolicy::Linear, InterpolationPolicy::Step] {
                assert_eq!(compute_coefficient(ratio, &thresholds, &tactical(), policy), 0.0);
            }
        }
    }

    #[test]
    fn control_points_are_returned_exactly() {
        let thresholds = ThresholdTable::standard();
        let scale = tactical();
        for level in ThresholdLevel::ordered() {
            let trigger = thresholds.trigger(level).expect("standard table has every level");
            assert_eq!(
                compute_coefficient(trigger, &thresholds, &scale, InterpolationPolicy::Linear),
                scale.value_at(level)
            );
        }
    }

    #[test]
    fn linear_clamps_above_exceeded() {
        let thresholds = ThresholdTable::standard();
        for ratio in [1.10, 1.5, 4.0, f64::INFINITY] {
            assert_eq!(
                compute_coefficient(ratio, &thresholds, &tactical(), InterpolationPolicy::Linear),
                9.0
            );
        }
    }

    #[test]
    fn linear_interpolates_between_triggers() {
        let thresholds = ThresholdTable::standard();
        let value = compute_coefficient(
            0.975,
            &thresholds,
            &tactical(),
            InterpolationPolicy::Linear,
        );
        assert!((value - 6.0).abs() < 1e-9, "got {value}");

        let score = compute_coefficient(
            1.05,
            &thresholds,
            &ScaleRow::performance(),
            InterpolationPolicy::Linear,
        );
        assert!((score - 1.1).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn linear_is_non_decreasing_for_increasing_scales() {
        let thresholds = ThresholdTable::standard();
        let scale = tactical();
        let mut previous = 0.0;
        for step in 0..=300 {
            let ratio = step as f64 / 200.0;
            let value = compute_coefficient(ratio, &thresholds, &scale, InterpolationPolicy::Linear);
            assert!(
                value >= previous - 1e-12,
                "coefficient dropped at ratio {ratio}: {value} < {previous}"
            );
            previous = value;
        }
    }

    #[test]
    fn step_returns_floor_band_value() {
        let thresholds = ThresholdTable::standard();
        let scale = ScaleRow::performance();
        let at = |ratio| compute_coefficient(ratio, &thresholds, &scale, InterpolationPolicy::Step);

        assert_eq!(at(1.0), 1.0);
        assert_eq!(at(0.92), 0.6);
        assert_eq!(at(0.99), 0.8);
        assert_eq!(at(1.09), 1.0);
        assert_eq!(at(3.0), 1.2);
    }

    #[test]
    fn incomplete_thresholds_resolve_to_zero() {
        let thresholds = ThresholdTable::new(vec![
            Threshold::new(ThresholdLevel::Minimum, 0.9),
            Threshold::new(ThresholdLevel::Partial, 0.95),
            Threshold::new(ThresholdLevel::Exceeded, 1.1),
        ]);

        for policy in [InterpolationPolicy::Linear, InterpolationPolicy::Step] {
            assert_eq!(compute_coefficient(1.0, &thresholds, &tactical(), policy), 0.0);
        }
    }

    #[test]
    fn non_increasing_thresholds_resolve_to_zero() {
        let thresholds = ThresholdTable::new(vec![
            Threshold::new(ThresholdLevel::Minimum, 0.9),
            Threshold::new(ThresholdLevel::Partial, 1.0),
            Threshold::new(ThresholdLevel::Target, 0.95),
            Threshold::new(ThresholdLevel::Exceeded, 1.1),
        ]);

        assert_eq!(
            compute_coefficient(1.0, &thresholds, &tactical(), InterpolationPolicy::Linear),
            0.0
        );
    }

    #[test]
    fn rows_may_arrive_out_of_order() {
        let thresholds = ThresholdTable::new(vec![
            Threshold::new(ThresholdLevel::Exceeded, 1.1),
            Threshold::new(ThresholdLevel::Target, 1.0),
            Threshold::new(ThresholdLevel::Minimum, 0.9),
            Threshold::new(ThresholdLevel::Partial, 0.95),
        ]);

        assert_eq!(
            compute_coefficient(1.0, &thresholds, &tactical(), InterpolationPolicy::Linear),
            8.0
        );
    }

    #[test]
    fn nan_ratio_is_gated() {
        let thresholds = ThresholdTable::standard();
        assert_eq!(
            compute_coefficient(f64::NAN, &thresholds, &tactical(), InterpolationPolicy::Linear),
            0.0
        );
    }

    #[test]
    fn achievement_ratio_guards_non_positive_targets() {
        assert_eq!(achievement_ratio(50.0, 0.0), 0.0);
        assert_eq!(achievement_ratio(50.0, -10.0), 0.0);
        assert_eq!(achievement_ratio(95.0, 100.0), 0.95);
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(InterpolationPolicy::parse("Linear"), Some(InterpolationPolicy::Linear));
        assert_eq!(InterpolationPolicy::parse(" step "), Some(InterpolationPolicy::Step));
        assert_eq!(InterpolationPolicy::parse("cubic"), None);
    }
}
