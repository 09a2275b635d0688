//! Text and CSV renderings of scorecards and payroll runs.

mod format;

pub use format::{format_currency, format_multiple, format_percent};

use serde::Serialize;

use super::composer::BonusResult;
use super::domain::ConfigurationIssue;
use super::payroll::PayrollRun;
use super::scorecard::CorporateScorecard;

pub fn render_scorecard(scorecard: &CorporateScorecard, issues: &[ConfigurationIssue]) -> String {
    let mut output = String::from("Corporate scorecard\n");

    if scorecard.details.is_empty() {
        output.push_str("No corporate indicators configured.\n");
    } else {
        for detail in &scorecard.details {
            output.push_str(&format!(
                "- {} (weight {}%): achievement {}, score {:.2}, contribution {:.4}\n",
                detail.name,
                detail.weight_percent,
                format_percent(detail.achievement_ratio),
                detail.score,
                detail.contribution
            ));
        }
    }

    output.push_str(&format!("Final corporate score: {:.2}\n", scorecard.score));
    if !scorecard.details.is_empty() {
        if scorecard.weights_balanced {
            output.push_str("Weights balanced (100%)\n");
        } else {
            output.push_str(&format!(
                "Warning: weights sum to {}%, expected 100%\n",
                scorecard.total_weight
            ));
        }
    }

    for issue in issues {
        if !matches!(issue, ConfigurationIssue::WeightMismatch { .. }) {
            output.push_str(&format!("Warning: {}\n", issue.summary()));
        }
    }

    output
}

pub fn render_payroll(run: &PayrollRun) -> String {
    let mut output = render_scorecard(&run.corporate, &run.issues);

    output.push('\n');
    output.push_str(&format!(
        "Bonus payroll ({} policy, role lookup by {} {:.4})\n",
        run.settings.policy.label(),
        run.settings.corporate_axis.label(),
        run.corporate_input
    ));

    if run.rows.is_empty() {
        output.push_str("No employees registered.\n");
    } else {
        for row in &run.rows {
            output.push_str(&format!(
                "- #{} {} ({}): salary {}, {} months, multiple {}, individual {}, factor {:.2}, bonus {}\n",
                row.employee_id.0,
                row.name,
                row.role,
                format_currency(row.base_salary),
                row.months_active,
                format_multiple(row.role_multiple),
                format_percent(row.individual_score),
                row.global_factor,
                format_currency(row.bonus_amount)
            ));
        }
    }

    output.push_str(&format!(
        "Total bonus cost: {}\n",
        format_currency(run.total_bonus)
    ));
    output
}

#[derive(Serialize)]
struct PayrollCsvRow<'a> {
    employee_id: u64,
    name: &'a str,
    role: &'a str,
    base_salary: f64,
    months_active: u8,
    corporate_input: f64,
    role_multiple: f64,
    individual_score: f64,
    global_factor: f64,
    bonus_amount: f64,
}

impl<'a> From<&'a BonusResult> for PayrollCsvRow<'a> {
    fn from(row: &'a BonusResult) -> Self {
        Self {
            employee_id: row.employee_id.0,
            name: &row.name,
            role: &row.role,
            base_salary: row.base_salary,
            months_active: row.months_active,
            corporate_input: row.corporate_input,
            role_multiple: row.role_multiple,
            individual_score: row.individual_score,
            global_factor: row.global_factor,
            bonus_amount: row.bonus_amount,
        }
    }
}

/// Write one CSV record per payroll row, with a header line.
pub fn write_payroll_csv<W: std::io::Write>(run: &PayrollRun, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in &run.rows {
        csv_writer.serialize(PayrollCsvRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}
