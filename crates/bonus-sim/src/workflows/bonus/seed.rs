use super::domain::{EmployeeInput, IndividualGoal, KpiInput, ScaleRow};
use super::tables::{BonusTables, TableError};

fn goal(description: &str, weight_percent: u32, goal: f64, realized: f64) -> IndividualGoal {
    IndividualGoal {
        description: description.to_string(),
        weight_percent,
        goal,
        realized,
    }
}

impl BonusTables {
    /// Default session contents: four roles, the standard triggers, two
    /// corporate indicators, and one employee with individual goals.
    pub fn seeded() -> Self {
        match Self::try_seeded() {
            Ok(tables) => tables,
            Err(error) => {
                tracing::error!(%error, "seed tables rejected; starting with an empty session");
                Self::empty()
            }
        }
    }

    fn try_seeded() -> Result<Self, TableError> {
        let mut tables = Self::empty();

        tables.replace_role_scales(vec![
            ScaleRow::role("Estagiário", [0.6, 0.8, 1.0, 1.2]),
            ScaleRow::role("Operacional", [0.6, 0.8, 1.0, 1.2]),
            ScaleRow::role("Tático", [1.0, 3.0, 5.0, 6.0]),
            ScaleRow::role("Estratégico", [2.0, 4.0, 8.0, 9.0]),
        ])?;

        tables.create_kpi(KpiInput {
            name: "Receitas".to_string(),
            weight_percent: 80,
            target: 40_735_845.0,
            actual: 38_700_644.0,
        })?;
        tables.create_kpi(KpiInput {
            name: "Fluxo Caixa".to_string(),
            weight_percent: 20,
            target: 16_922_142.0,
            actual: 18_154_955.0,
        })?;

        let mut employee = EmployeeInput::new("João Silva", "Tático", 12_000.0, 12);
        employee.goals = vec![
            goal("Dashboard Resultados", 25, 100.0, 50.0),
            goal("Processos Financeiros", 25, 100.0, 95.0),
            goal("Migração Netsuite", 50, 100.0, 95.0),
        ];
        tables.create_employee(employee)?;

        Ok(tables)
    }
}
