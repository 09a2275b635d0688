//! Bonus calculation workflow: interpolation engine, scorecards, payroll
//! composition, and the editable session tables behind the HTTP API.

pub mod access;
pub mod composer;
pub mod domain;
pub mod engine;
pub mod payroll;
pub mod report;
pub mod repository;
pub mod router;
pub mod scenario;
pub mod scorecard;
mod seed;
pub mod service;
pub mod tables;

#[cfg(test)]
mod tests;

pub use access::{require_access, AccessDenied, AccessGate, ACCESS_HEADER};
pub use composer::{compute_bonus, prorata, BonusResult};
pub use domain::{
    ConfigurationIssue, Employee, EmployeeId, EmployeeInput, IndividualGoal, Kpi, KpiId,
    KpiInput, RoleScaleTable, ScaleKey, ScaleRow, Threshold, ThresholdLevel, ThresholdTable,
};
pub use engine::{achievement_ratio, compute_coefficient, InterpolationPolicy};
pub use payroll::{run_payroll, CalculationSettings, CorporateAxis, PayrollRun};
pub use report::{render_payroll, render_scorecard, write_payroll_csv};
pub use repository::{RepositoryError, SessionRepository};
pub use router::bonus_router;
pub use scenario::{ScenarioError, ScenarioFile, ScenarioLoader};
pub use scorecard::{
    compute_corporate_score, compute_individual_score, CorporateScorecard, GoalDetail,
    GoalScorecard, KpiDetail,
};
pub use service::{BonusService, BonusServiceError, ScorecardView};
pub use tables::{BonusTables, RecordTable, TableError, MAX_WEIGHT_PERCENT};
