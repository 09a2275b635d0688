use std::collections::{BTreeMap, HashSet};

use super::domain::{
    ConfigurationIssue, Employee, EmployeeId, EmployeeInput, IndividualGoal, Kpi, KpiId,
    KpiInput, RoleScaleTable, ScaleKey, ScaleRow, Threshold, ThresholdTable,
};
use super::scorecard::compute_individual_score;

/// Validation failures for table edits. A rejected edit leaves the tables
/// untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("kpi {0} not found")]
    KpiNotFound(u64),
    #[error("employee {0} not found")]
    EmployeeNotFound(u64),
    #[error("months active must be between 1 and 12 (found {0})")]
    MonthsOutOfRange(u8),
    #[error("base salary must be a non-negative amount (found {0})")]
    InvalidSalary(f64),
    #[error("role '{0}' has no salary multiple row")]
    UnknownRole(String),
    #[error("role scale rows must be keyed by role name (found {} row)", .0.label())]
    InvalidScaleKey(ScaleKey),
    #[error("role name must not be empty")]
    EmptyRoleName,
    #[error("role '{0}' appears more than once")]
    DuplicateRole(String),
    #[error("weight must be between 0 and 100 percent (found {0})")]
    WeightOutOfRange(u32),
}

/// Upper bound for a single KPI or goal weight.
pub const MAX_WEIGHT_PERCENT: u32 = 100;

fn check_weight(weight_percent: u32) -> Result<(), TableError> {
    if weight_percent > MAX_WEIGHT_PERCENT {
        return Err(TableError::WeightOutOfRange(weight_percent));
    }
    Ok(())
}

fn check_goals(goals: &[IndividualGoal]) -> Result<(), TableError> {
    goals
        .iter()
        .try_for_each(|goal| check_weight(goal.weight_percent))
}

fn total_weight(weights: impl Iterator<Item = u32>) -> u32 {
    weights.fold(0, u32::saturating_add)
}

/// Rows keyed by a stable id. Ids are handed out sequentially from 1 and
/// never reused once deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable<I: Ord, T> {
    next_id: u64,
    records: BTreeMap<I, T>,
}

impl<I, T> Default for RecordTable<I, T>
where
    I: Ord,
{
    fn default() -> Self {
        Self {
            next_id: 1,
            records: BTreeMap::new(),
        }
    }
}

impl<I, T> RecordTable<I, T>
where
    I: Ord + Copy + From<u64>,
{
    pub fn insert_with(&mut self, build: impl FnOnce(I) -> T) -> I {
        let id = I::from(self.next_id);
        self.next_id += 1;
        self.records.insert(id, build(id));
        id
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.records.get_mut(&id)
    }

    pub fn remove(&mut self, id: I) -> Option<T> {
        self.records.remove(&id)
    }

    pub fn contains(&self, id: I) -> bool {
        self.records.contains_key(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.records.values_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Editable session state feeding every calculation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BonusTables {
    thresholds: ThresholdTable,
    role_scales: RoleScaleTable,
    global_factor: Option<ScaleRow>,
    kpis: RecordTable<KpiId, Kpi>,
    employees: RecordTable<EmployeeId, Employee>,
}

impl BonusTables {
    /// Empty tables with the standard thresholds and no roles.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn role_scales(&self) -> &RoleScaleTable {
        &self.role_scales
    }

    pub fn global_factor(&self) -> Option<&ScaleRow> {
        self.global_factor.as_ref()
    }

    pub fn kpis(&self) -> Vec<Kpi> {
        self.kpis.values().cloned().collect()
    }

    pub fn kpi(&self, id: KpiId) -> Option<&Kpi> {
        self.kpis.get(id)
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.employees.values().cloned().collect()
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.get(id)
    }

    /// Replace the trigger table. Incomplete tables are accepted and surface
    /// through [`BonusTables::issues`]; goal-driven scores are recomputed.
    pub fn replace_thresholds(&mut self, rows: Vec<Threshold>) {
        self.thresholds = ThresholdTable::new(rows);
        let thresholds = self.thresholds.clone();
        for employee in self.employees.values_mut() {
            rescore_goals(employee, &thresholds);
        }
    }

    pub fn replace_role_scales(&mut self, rows: Vec<ScaleRow>) -> Result<(), TableError> {
        let mut seen = HashSet::new();
        for row in &rows {
            let ScaleKey::Role(name) = &row.key else {
                return Err(TableError::InvalidScaleKey(row.key.clone()));
            };
            if name.trim().is_empty() {
                return Err(TableError::EmptyRoleName);
            }
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateRole(name.clone()));
            }
        }

        self.role_scales = RoleScaleTable::new(rows);
        Ok(())
    }

    /// Set or clear the global adjustment row. The values are always stored
    /// under [`ScaleKey::GlobalFactor`].
    pub fn set_global_factor(&mut self, values: Option<[f64; 4]>) {
        self.global_factor = values.map(ScaleRow::global_factor);
    }

    pub fn create_kpi(&mut self, input: KpiInput) -> Result<KpiId, TableError> {
        check_weight(input.weight_percent)?;
        Ok(self.kpis.insert_with(|id| input.into_record(id)))
    }

    pub fn update_kpi(&mut self, id: KpiId, input: KpiInput) -> Result<&Kpi, TableError> {
        let slot = self.kpis.get_mut(id).ok_or(TableError::KpiNotFound(id.0))?;
        check_weight(input.weight_percent)?;
        *slot = input.into_record(id);
        Ok(&*slot)
    }

    pub fn delete_kpi(&mut self, id: KpiId) -> Result<Kpi, TableError> {
        self.kpis.remove(id).ok_or(TableError::KpiNotFound(id.0))
    }

    pub fn create_employee(&mut self, input: EmployeeInput) -> Result<EmployeeId, TableError> {
        self.validate_employee(&input)?;
        let thresholds = &self.thresholds;
        Ok(self.employees.insert_with(|id| {
            let mut employee = input.into_record(id);
            rescore_goals(&mut employee, thresholds);
            employee
        }))
    }

    pub fn update_employee(
        &mut self,
        id: EmployeeId,
        input: EmployeeInput,
    ) -> Result<&Employee, TableError> {
        if !self.employees.contains(id) {
            return Err(TableError::EmployeeNotFound(id.0));
        }
        self.validate_employee(&input)?;

        let mut employee = input.into_record(id);
        rescore_goals(&mut employee, &self.thresholds);
        let slot = self
            .employees
            .get_mut(id)
            .ok_or(TableError::EmployeeNotFound(id.0))?;
        *slot = employee;
        Ok(&*slot)
    }

    pub fn delete_employee(&mut self, id: EmployeeId) -> Result<Employee, TableError> {
        self.employees
            .remove(id)
            .ok_or(TableError::EmployeeNotFound(id.0))
    }

    /// Replace an employee's goals and recompute the individual score.
    pub fn replace_goals(
        &mut self,
        id: EmployeeId,
        goals: Vec<IndividualGoal>,
    ) -> Result<&Employee, TableError> {
        let thresholds = &self.thresholds;
        let employee = self
            .employees
            .get_mut(id)
            .ok_or(TableError::EmployeeNotFound(id.0))?;
        check_goals(&goals)?;
        employee.goals = goals;
        rescore_goals(employee, thresholds);
        Ok(&*employee)
    }

    /// Configuration warnings that do not block a calculation.
    pub fn issues(&self) -> Vec<ConfigurationIssue> {
        let mut issues = self.thresholds.issues();

        if !self.kpis.is_empty() {
            let total_weight = total_weight(self.kpis.values().map(|kpi| kpi.weight_percent));
            if total_weight != 100 {
                issues.push(ConfigurationIssue::WeightMismatch { total_weight });
            }
        }

        issues.extend(
            self.kpis
                .values()
                .filter(|kpi| !(kpi.target > 0.0))
                .map(|kpi| ConfigurationIssue::NonPositiveTarget {
                    kpi_id: kpi.id,
                    name: kpi.name.clone(),
                }),
        );

        issues.extend(
            self.employees
                .values()
                .filter(|employee| !self.role_scales.contains(&employee.role))
                .map(|employee| ConfigurationIssue::UnknownRole {
                    employee_id: employee.id,
                    role: employee.role.clone(),
                }),
        );

        issues.extend(self.employees.values().filter_map(|employee| {
            if employee.goals.is_empty() {
                return None;
            }
            let total_weight = total_weight(employee.goals.iter().map(|goal| goal.weight_percent));
            (total_weight != 100).then_some(ConfigurationIssue::GoalWeightMismatch {
                employee_id: employee.id,
                total_weight,
            })
        }));

        issues
    }

    fn validate_employee(&self, input: &EmployeeInput) -> Result<(), TableError> {
        if !(1..=12).contains(&input.months_active) {
            return Err(TableError::MonthsOutOfRange(input.months_active));
        }
        if !input.base_salary.is_finite() || input.base_salary < 0.0 {
            return Err(TableError::InvalidSalary(input.base_salary));
        }
        if !self.role_scales.contains(&input.role) {
            return Err(TableError::UnknownRole(input.role.clone()));
        }
        check_goals(&input.goals)
    }
}

fn rescore_goals(employee: &mut Employee, thresholds: &ThresholdTable) {
    if !employee.goals.is_empty() {
        employee.individual_performance_score =
            compute_individual_score(&employee.goals, thresholds).score;
    }
}
