use serde::{Deserialize, Serialize};

use super::composer::{compute_bonus, BonusResult};
use super::domain::ConfigurationIssue;
use super::engine::InterpolationPolicy;
use super::scorecard::{compute_corporate_score, CorporateScorecard};
use super::tables::BonusTables;

/// Which corporate figure is used as the x-axis of the role lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorporateAxis {
    /// The interpolated corporate score (roughly 0.6 to 1.2).
    #[default]
    Score,
    /// Weighted raw achievement ratio across KPIs.
    Achievement,
}

impl CorporateAxis {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Score => "corporate score",
            Self::Achievement => "weighted achievement",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "score" | "corporate_score" => Some(Self::Score),
            "achievement" | "weighted_achievement" => Some(Self::Achievement),
            _ => None,
        }
    }

    pub fn select(self, scorecard: &CorporateScorecard) -> f64 {
        match self {
            Self::Score => scorecard.score,
            Self::Achievement => scorecard.weighted_achievement,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalculationSettings {
    #[serde(default)]
    pub policy: InterpolationPolicy,
    #[serde(default)]
    pub corporate_axis: CorporateAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    pub settings: CalculationSettings,
    pub corporate: CorporateScorecard,
    pub corporate_input: f64,
    pub rows: Vec<BonusResult>,
    pub total_bonus: f64,
    pub issues: Vec<ConfigurationIssue>,
}

/// Recompute the corporate scorecard and every employee's bonus from the
/// current tables. Nothing is carried over between runs.
pub fn run_payroll(tables: &BonusTables, settings: CalculationSettings) -> PayrollRun {
    let corporate = compute_corporate_score(&tables.kpis(), tables.thresholds());
    let corporate_input = settings.corporate_axis.select(&corporate);

    let rows: Vec<BonusResult> = tables
        .employees()
        .iter()
        .map(|employee| {
            compute_bonus(
                employee,
                corporate_input,
                tables.thresholds(),
                tables.role_scales(),
                tables.global_factor(),
                settings.policy,
            )
        })
        .collect();

    let total_bonus = rows.iter().map(|row| row.bonus_amount).sum();

    PayrollRun {
        settings,
        corporate,
        corporate_input,
        rows,
        total_bonus,
        issues: tables.issues(),
    }
}
