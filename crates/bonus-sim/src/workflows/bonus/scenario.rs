use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{EmployeeInput, KpiInput, ScaleRow, Threshold, ThresholdTable};
use super::tables::{BonusTables, TableError};

#[derive(Debug)]
pub enum ScenarioError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Table(TableError),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::Io(err) => write!(f, "failed to read scenario file: {}", err),
            ScenarioError::Json(err) => write!(f, "invalid scenario JSON: {}", err),
            ScenarioError::Table(err) => write!(f, "scenario rows rejected: {}", err),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io(err) => Some(err),
            ScenarioError::Json(err) => Some(err),
            ScenarioError::Table(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<TableError> for ScenarioError {
    fn from(err: TableError) -> Self {
        Self::Table(err)
    }
}

/// Full set of editable tables as exchanged with a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default = "standard_thresholds")]
    pub thresholds: Vec<Threshold>,
    pub role_scales: Vec<ScaleRow>,
    #[serde(default)]
    pub global_factor: Option<[f64; 4]>,
    #[serde(default)]
    pub kpis: Vec<KpiInput>,
    #[serde(default)]
    pub employees: Vec<EmployeeInput>,
}

fn standard_thresholds() -> Vec<Threshold> {
    ThresholdTable::standard().rows().to_vec()
}

impl ScenarioFile {
    /// Apply the rows in file order through the regular table edits, so ids
    /// and validation match interactive editing.
    pub fn into_tables(self) -> Result<BonusTables, ScenarioError> {
        let mut tables = BonusTables::empty();
        tables.replace_thresholds(self.thresholds);
        tables.replace_role_scales(self.role_scales)?;
        tables.set_global_factor(self.global_factor);

        for kpi in self.kpis {
            tables.create_kpi(kpi)?;
        }
        for employee in self.employees {
            tables.create_employee(employee)?;
        }

        Ok(tables)
    }
}

pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<BonusTables, ScenarioError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<BonusTables, ScenarioError> {
        let scenario: ScenarioFile = serde_json::from_reader(reader)?;
        scenario.into_tables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::bonus::domain::EmployeeId;
    use std::io::Cursor;

    const SCENARIO: &str = r#"{
        "role_scales": [
            { "key": { "role": "Analista" }, "value_at_minimum": 0.5, "value_at_partial": 1.0,
              "value_at_target": 2.0, "value_at_exceeded": 2.5 }
        ],
        "global_factor": [0.8, 0.9, 1.0, 1.05],
        "kpis": [
            { "name": "Receitas", "weight_percent": 100, "target": 1000.0, "actual": 1000.0 }
        ],
        "employees": [
            { "name": "Bia", "role": "Analista", "base_salary": 6000.0, "months_active": 6 }
        ]
    }"#;

    #[test]
    fn loads_tables_with_defaults_for_omitted_sections() {
        let tables = ScenarioLoader::from_reader(Cursor::new(SCENARIO)).expect("scenario loads");

        assert_eq!(tables.thresholds(), &ThresholdTable::standard());
        assert!(tables.role_scales().contains("Analista"));
        assert_eq!(
            tables.global_factor().map(ScaleRow::values),
            Some([0.8, 0.9, 1.0, 1.05])
        );
        let employee = tables.employee(EmployeeId(1)).expect("employee loaded");
        assert_eq!(employee.individual_performance_score, 1.0);
        assert_eq!(employee.months_active, 6);
    }

    #[test]
    fn rejects_employees_with_unknown_roles() {
        let scenario = SCENARIO.replace(
            r#""name": "Bia", "role": "Analista""#,
            r#""name": "Bia", "role": "Gerente""#,
        );
        match ScenarioLoader::from_reader(Cursor::new(scenario)) {
            Err(ScenarioError::Table(TableError::UnknownRole(role))) => assert_eq!(role, "Gerente"),
            other => panic!("expected unknown role error, got {other:?}"),
        }
    }

    #[test]
    fn reports_malformed_json() {
        let result = ScenarioLoader::from_reader(Cursor::new("{ \"role_scales\": ["));
        assert!(matches!(result, Err(ScenarioError::Json(_))));
    }
}
