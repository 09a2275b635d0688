use serde::{Deserialize, Serialize};

use super::domain::{IndividualGoal, Kpi, KpiId, ScaleRow, ThresholdTable};
use super::engine::{achievement_ratio, compute_coefficient, InterpolationPolicy};

/// Per-KPI line of the corporate scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDetail {
    pub kpi_id: KpiId,
    pub name: String,
    pub weight_percent: u32,
    pub achievement_ratio: f64,
    pub score: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateScorecard {
    pub score: f64,
    pub total_weight: u32,
    /// Weighted raw achievement, before the performance scale is applied.
    pub weighted_achievement: f64,
    pub weights_balanced: bool,
    pub details: Vec<KpiDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDetail {
    pub description: String,
    pub weight_percent: u32,
    pub achievement_ratio: f64,
    pub score: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalScorecard {
    pub score: f64,
    pub total_weight: u32,
    pub details: Vec<GoalDetail>,
}

struct ScoredLine {
    ratio: f64,
    score: f64,
    contribution: f64,
}

fn score_line(
    target: f64,
    actual: f64,
    weight_percent: u32,
    thresholds: &ThresholdTable,
) -> ScoredLine {
    let ratio = achievement_ratio(actual, target);
    let score = compute_coefficient(
        ratio,
        thresholds,
        &ScaleRow::performance(),
        InterpolationPolicy::Linear,
    );

    ScoredLine {
        ratio,
        score,
        contribution: score * f64::from(weight_percent) / 100.0,
    }
}

/// Weighted corporate score. Weights are used as given: a total other than
/// 100 is reported through `weights_balanced`, never normalized. An empty
/// indicator list counts as balanced.
pub fn compute_corporate_score(
    kpis: &[Kpi],
    thresholds: &ThresholdTable,
) -> CorporateScorecard {
    let mut score = 0.0;
    let mut total_weight = 0;
    let mut weighted_achievement = 0.0;
    let mut details = Vec::with_capacity(kpis.len());

    for kpi in kpis {
        let line = score_line(kpi.target, kpi.actual, kpi.weight_percent, thresholds);
        score += line.contribution;
        total_weight = u32::saturating_add(total_weight, kpi.weight_percent);
        weighted_achievement += line.ratio * f64::from(kpi.weight_percent) / 100.0;

        details.push(KpiDetail {
            kpi_id: kpi.id,
            name: kpi.name.clone(),
            weight_percent: kpi.weight_percent,
            achievement_ratio: line.ratio,
            score: line.score,
            contribution: line.contribution,
        });
    }

    CorporateScorecard {
        score,
        total_weight,
        weighted_achievement,
        weights_balanced: details.is_empty() || total_weight == 100,
        details,
    }
}

/// Individual performance score from an employee's weighted goals.
pub fn compute_individual_score(
    goals: &[IndividualGoal],
    thresholds: &ThresholdTable,
) -> GoalScorecard {
    let mut score = 0.0;
    let mut total_weight = 0;
    let mut details = Vec::with_capacity(goals.len());

    for goal in goals {
        let line = score_line(goal.goal, goal.realized, goal.weight_percent, thresholds);
        score += line.contribution;
        total_weight = u32::saturating_add(total_weight, goal.weight_percent);

        details.push(GoalDetail {
            description: goal.description.clone(),
            weight_percent: goal.weight_percent,
            achievement_ratio: line.ratio,
            score: line.score,
            contribution: line.contribution,
        });
    }

    GoalScorecard {
        score,
        total_weight,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(id: u64, name: &str, weight_percent: u32, target: f64, actual: f64) -> Kpi {
        Kpi {
            id: KpiId(id),
            name: name.to_string(),
            weight_percent,
            target,
            actual,
        }
    }

    fn seeded_kpis() -> Vec<Kpi> {
        vec![
            kpi(1, "Receitas", 80, 40_735_845.0, 38_700_644.0),
            kpi(2, "Fluxo Caixa", 20, 16_922_142.0, 18_154_955.0),
        ]
    }

    #[test]
    fn seeded_indicators_score_below_the_minimum_gate() {
        let scorecard = compute_corporate_score(&seeded_kpis(), &ThresholdTable::standard());

        assert_eq!(scorecard.total_weight, 100);
        assert!(scorecard.weights_balanced);
        assert_eq!(scorecard.details.len(), 2);

        let revenue = &scorecard.details[0];
        assert!((revenue.achievement_ratio - 0.95).abs() < 1e-4);
        assert!((revenue.score - 0.8).abs() < 1e-3);
        assert!((revenue.contribution - 0.64).abs() < 1e-3);

        let cash = &scorecard.details[1];
        assert!((cash.achievement_ratio - 1.0728).abs() < 1e-3);
        assert!((cash.score - 1.1456).abs() < 1e-3);

        assert!((scorecard.score - 0.86912).abs() < 1e-3, "got {}", scorecard.score);
        assert!(scorecard.score < 0.90);
    }

    #[test]
    fn empty_scorecard_is_zero() {
        let scorecard = compute_corporate_score(&[], &ThresholdTable::standard());
        assert_eq!(scorecard.score, 0.0);
        assert_eq!(scorecard.total_weight, 0);
        assert_eq!(scorecard.weighted_achievement, 0.0);
        assert!(scorecard.weights_balanced);
        assert!(scorecard.details.is_empty());
    }

    #[test]
    fn oversized_weights_saturate_instead_of_overflowing() {
        let kpis = vec![
            kpi(1, "Receitas", u32::MAX, 100.0, 100.0),
            kpi(2, "Fluxo Caixa", 101, 100.0, 100.0),
        ];
        let scorecard = compute_corporate_score(&kpis, &ThresholdTable::standard());

        assert_eq!(scorecard.total_weight, u32::MAX);
        assert!(!scorecard.weights_balanced);
    }

    #[test]
    fn unbalanced_weights_are_not_normalized() {
        let kpis = vec![kpi(1, "Receitas", 60, 100.0, 100.0)];
        let scorecard = compute_corporate_score(&kpis, &ThresholdTable::standard());

        assert_eq!(scorecard.total_weight, 60);
        assert!(!scorecard.weights_balanced);
        assert!((scorecard.score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn zero_target_contributes_nothing() {
        let kpis = vec![kpi(1, "EBITDA", 100, 0.0, 5_000.0)];
        let scorecard = compute_corporate_score(&kpis, &ThresholdTable::standard());

        assert_eq!(scorecard.details[0].achievement_ratio, 0.0);
        assert_eq!(scorecard.score, 0.0);
    }

    #[test]
    fn score_is_order_independent() {
        let thresholds = ThresholdTable::standard();
        let forward = compute_corporate_score(&seeded_kpis(), &thresholds);
        let mut reversed_kpis = seeded_kpis();
        reversed_kpis.reverse();
        let reversed = compute_corporate_score(&reversed_kpis, &thresholds);

        assert!((forward.score - reversed.score).abs() < 1e-12);
        assert_eq!(forward.total_weight, reversed.total_weight);
    }

    #[test]
    fn weighted_achievement_uses_raw_ratios() {
        let scorecard = compute_corporate_score(&seeded_kpis(), &ThresholdTable::standard());
        let expected = (38_700_644.0 / 40_735_845.0) * 0.8 + (18_154_955.0 / 16_922_142.0) * 0.2;
        assert!((scorecard.weighted_achievement - expected).abs() < 1e-12);
    }

    #[test]
    fn individual_goals_use_the_same_scale() {
        let goals = vec![
            IndividualGoal {
                description: "Dashboard Resultados".to_string(),
                weight_percent: 25,
                goal: 100.0,
                realized: 50.0,
            },
            IndividualGoal {
                description: "Processos Financeiros".to_string(),
                weight_percent: 25,
                goal: 100.0,
                realized: 95.0,
            },
            IndividualGoal {
                description: "Migração Netsuite".to_string(),
                weight_percent: 50,
                goal: 100.0,
                realized: 95.0,
            },
        ];

        let scorecard = compute_individual_score(&goals, &ThresholdTable::standard());

        assert_eq!(scorecard.total_weight, 100);
        assert_eq!(scorecard.details[0].score, 0.0);
        assert_eq!(scorecard.details[1].score, 0.8);
        assert!((scorecard.score - 0.6).abs() < 1e-12);
    }
}
