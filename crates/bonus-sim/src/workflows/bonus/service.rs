use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    ConfigurationIssue, Employee, EmployeeId, EmployeeInput, IndividualGoal, Kpi, KpiId,
    KpiInput, RoleScaleTable, ScaleRow, Threshold, ThresholdTable,
};
use super::payroll::{run_payroll, CalculationSettings, PayrollRun};
use super::repository::{RepositoryError, SessionRepository};
use super::scorecard::{
    compute_corporate_score, compute_individual_score, CorporateScorecard, GoalScorecard,
};
use super::tables::{BonusTables, TableError};

/// Corporate panel as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorecardView {
    pub scorecard: CorporateScorecard,
    pub issues: Vec<ConfigurationIssue>,
}

/// Service wrapping the session repository with the table edits and the
/// calculation pipeline.
pub struct BonusService<R> {
    repository: Arc<R>,
    settings: CalculationSettings,
    edits: Mutex<()>,
}

impl<R> BonusService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(repository: Arc<R>, settings: CalculationSettings) -> Self {
        Self {
            repository,
            settings,
            edits: Mutex::new(()),
        }
    }

    /// Settings used when a payroll request does not override them.
    pub fn settings(&self) -> CalculationSettings {
        self.settings
    }

    pub fn tables(&self) -> Result<BonusTables, BonusServiceError> {
        Ok(self.repository.load()?)
    }

    pub fn thresholds(&self) -> Result<ThresholdTable, BonusServiceError> {
        Ok(self.tables()?.thresholds().clone())
    }

    pub fn replace_thresholds(
        &self,
        rows: Vec<Threshold>,
    ) -> Result<ThresholdTable, BonusServiceError> {
        let thresholds = self.edit(|tables| {
            tables.replace_thresholds(rows);
            Ok(tables.thresholds().clone())
        })?;

        let issues = thresholds.issues();
        if issues.is_empty() {
            info!("threshold table replaced");
        } else {
            warn!(issues = issues.len(), "threshold table replaced with configuration issues");
        }
        Ok(thresholds)
    }

    pub fn role_scales(&self) -> Result<RoleScaleTable, BonusServiceError> {
        Ok(self.tables()?.role_scales().clone())
    }

    pub fn replace_role_scales(
        &self,
        rows: Vec<ScaleRow>,
    ) -> Result<RoleScaleTable, BonusServiceError> {
        let roles = self.edit(|tables| {
            tables.replace_role_scales(rows)?;
            Ok(tables.role_scales().clone())
        })?;
        info!(roles = roles.rows().len(), "role scale table replaced");
        Ok(roles)
    }

    pub fn global_factor(&self) -> Result<Option<ScaleRow>, BonusServiceError> {
        Ok(self.tables()?.global_factor().cloned())
    }

    pub fn set_global_factor(
        &self,
        values: Option<[f64; 4]>,
    ) -> Result<Option<ScaleRow>, BonusServiceError> {
        let row = self.edit(|tables| {
            tables.set_global_factor(values);
            Ok(tables.global_factor().cloned())
        })?;
        info!(enabled = row.is_some(), "global factor updated");
        Ok(row)
    }

    pub fn kpis(&self) -> Result<Vec<Kpi>, BonusServiceError> {
        Ok(self.tables()?.kpis())
    }

    pub fn create_kpi(&self, input: KpiInput) -> Result<Kpi, BonusServiceError> {
        let kpi = self.edit(|tables| {
            let id = tables.create_kpi(input)?;
            tables
                .kpi(id)
                .cloned()
                .ok_or(TableError::KpiNotFound(id.0))
        })?;
        info!(kpi_id = kpi.id.0, name = %kpi.name, "kpi created");
        Ok(kpi)
    }

    pub fn update_kpi(&self, id: KpiId, input: KpiInput) -> Result<Kpi, BonusServiceError> {
        let kpi = self.edit(|tables| tables.update_kpi(id, input).cloned())?;
        info!(kpi_id = id.0, "kpi updated");
        Ok(kpi)
    }

    pub fn delete_kpi(&self, id: KpiId) -> Result<Kpi, BonusServiceError> {
        let kpi = self.edit(|tables| tables.delete_kpi(id))?;
        info!(kpi_id = id.0, "kpi deleted");
        Ok(kpi)
    }

    pub fn employees(&self) -> Result<Vec<Employee>, BonusServiceError> {
        Ok(self.tables()?.employees())
    }

    pub fn create_employee(&self, input: EmployeeInput) -> Result<Employee, BonusServiceError> {
        let employee = self.edit(|tables| {
            let id = tables.create_employee(input)?;
            tables
                .employee(id)
                .cloned()
                .ok_or(TableError::EmployeeNotFound(id.0))
        })?;
        info!(employee_id = employee.id.0, role = %employee.role, "employee created");
        Ok(employee)
    }

    pub fn update_employee(
        &self,
        id: EmployeeId,
        input: EmployeeInput,
    ) -> Result<Employee, BonusServiceError> {
        let employee = self.edit(|tables| tables.update_employee(id, input).cloned())?;
        info!(employee_id = id.0, "employee updated");
        Ok(employee)
    }

    pub fn delete_employee(&self, id: EmployeeId) -> Result<Employee, BonusServiceError> {
        let employee = self.edit(|tables| tables.delete_employee(id))?;
        info!(employee_id = id.0, "employee deleted");
        Ok(employee)
    }

    pub fn replace_goals(
        &self,
        id: EmployeeId,
        goals: Vec<IndividualGoal>,
    ) -> Result<Employee, BonusServiceError> {
        let employee = self.edit(|tables| tables.replace_goals(id, goals).cloned())?;
        info!(
            employee_id = id.0,
            goals = employee.goals.len(),
            score = employee.individual_performance_score,
            "individual goals replaced"
        );
        Ok(employee)
    }

    /// Goal-by-goal breakdown of an employee's individual score.
    pub fn individual_scorecard(&self, id: EmployeeId) -> Result<GoalScorecard, BonusServiceError> {
        let tables = self.tables()?;
        let employee = tables
            .employee(id)
            .ok_or(TableError::EmployeeNotFound(id.0))?;
        Ok(compute_individual_score(&employee.goals, tables.thresholds()))
    }

    pub fn scorecard(&self) -> Result<ScorecardView, BonusServiceError> {
        let tables = self.tables()?;
        let scorecard = compute_corporate_score(&tables.kpis(), tables.thresholds());
        debug!(score = scorecard.score, "corporate scorecard computed");
        Ok(ScorecardView {
            scorecard,
            issues: tables.issues(),
        })
    }

    /// Run the payroll over the current session, optionally overriding the
    /// configured settings.
    pub fn payroll(
        &self,
        settings: Option<CalculationSettings>,
    ) -> Result<PayrollRun, BonusServiceError> {
        let tables = self.tables()?;
        let run = run_payroll(&tables, settings.unwrap_or(self.settings));

        info!(
            policy = run.settings.policy.label(),
            axis = run.settings.corporate_axis.label(),
            corporate_input = run.corporate_input,
            employees = run.rows.len(),
            total_bonus = run.total_bonus,
            "payroll computed"
        );
        for issue in &run.issues {
            warn!(issue = %issue.summary(), "payroll computed with configuration issue");
        }
        Ok(run)
    }

    /// Load, edit, and store the session under the edit lock. A rejected
    /// edit stores nothing.
    fn edit<T>(
        &self,
        apply: impl FnOnce(&mut BonusTables) -> Result<T, TableError>,
    ) -> Result<T, BonusServiceError> {
        let _guard = self.edits.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tables = self.repository.load()?;
        let value = apply(&mut tables)?;
        self.repository.store(tables)?;
        Ok(value)
    }
}

/// Error raised by the bonus service.
#[derive(Debug, thiserror::Error)]
pub enum BonusServiceError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
