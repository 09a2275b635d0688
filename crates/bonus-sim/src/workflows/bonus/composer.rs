use serde::{Deserialize, Serialize};

use super::domain::{Employee, EmployeeId, RoleScaleTable, ScaleRow, ThresholdTable};
use super::engine::{compute_coefficient, InterpolationPolicy};

/// Per-employee payout with every input echoed for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusResult {
    pub employee_id: EmployeeId,
    pub name: String,
    pub role: String,
    pub base_salary: f64,
    pub months_active: u8,
    pub prorata: f64,
    pub corporate_input: f64,
    pub role_multiple: f64,
    pub role_resolved: bool,
    pub individual_score: f64,
    pub global_factor: f64,
    pub bonus_amount: f64,
}

pub fn prorata(months_active: u8) -> f64 {
    f64::from(months_active) / 12.0
}

/// Combine the corporate lookup, tenure, and individual score into a bonus.
///
/// `corporate_input` is the x-axis fed to the role and global-factor lookups.
pub fn compute_bonus(
    employee: &Employee,
    corporate_input: f64,
    thresholds: &ThresholdTable,
    role_scales: &RoleScaleTable,
    global_factor: Option<&ScaleRow>,
    policy: InterpolationPolicy,
) -> BonusResult {
    let role_row = role_scales.row_for(&employee.role);
    let role_multiple = role_row
        .map(|row| compute_coefficient(corporate_input, thresholds, row, policy))
        .unwrap_or(0.0);

    let global_factor = global_factor
        .map(|row| compute_coefficient(corporate_input, thresholds, row, policy))
        .unwrap_or(1.0);

    let prorata = prorata(employee.months_active);

    let bonus_amount = if role_multiple == 0.0 {
        0.0
    } else {
        employee.base_salary
            * prorata
            * role_multiple
            * employee.individual_performance_score
            * global_factor
    };

    BonusResult {
        employee_id: employee.id,
        name: employee.name.clone(),
        role: employee.role.clone(),
        base_salary: employee.base_salary,
        months_active: employee.months_active,
        prorata,
        corporate_input,
        role_multiple,
        role_resolved: role_row.is_some(),
        individual_score: employee.individual_performance_score,
        global_factor,
        bonus_amount,
    }
}
