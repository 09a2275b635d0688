use serde::{Deserialize, Serialize};

/// Named achievement tiers, ordered from the payout gate upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdLevel {
    Minimum,
    Partial,
    Target,
    Exceeded,
}

impl ThresholdLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Minimum, Self::Partial, Self::Target, Self::Exceeded]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimum => "Minimum",
            Self::Partial => "Partial",
            Self::Target => "Target",
            Self::Exceeded => "Exceeded",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Minimum => 0,
            Self::Partial => 1,
            Self::Target => 2,
            Self::Exceeded => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub level: ThresholdLevel,
    pub trigger_ratio: f64,
}

impl Threshold {
    pub const fn new(level: ThresholdLevel, trigger_ratio: f64) -> Self {
        Self {
            level,
            trigger_ratio,
        }
    }
}

/// Editable trigger table. Rows are kept exactly as edited; resolution into
/// usable control points happens at calculation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    rows: Vec<Threshold>,
}

impl ThresholdTable {
    pub fn new(rows: Vec<Threshold>) -> Self {
        Self { rows }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            Threshold::new(ThresholdLevel::Minimum, 0.90),
            Threshold::new(ThresholdLevel::Partial, 0.95),
            Threshold::new(ThresholdLevel::Target, 1.00),
            Threshold::new(ThresholdLevel::Exceeded, 1.10),
        ])
    }

    pub fn rows(&self) -> &[Threshold] {
        &self.rows
    }

    pub fn trigger(&self, level: ThresholdLevel) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.level == level)
            .map(|row| row.trigger_ratio)
    }

    /// Trigger ratios in level order, or `None` when the table cannot drive a
    /// lookup (missing or repeated level, invalid or non-increasing triggers).
    pub fn control_points(&self) -> Option<[f64; 4]> {
        if self.issues().is_empty() {
            let mut points = [0.0; 4];
            for row in &self.rows {
                points[row.level.index()] = row.trigger_ratio;
            }
            Some(points)
        } else {
            None
        }
    }

    pub fn issues(&self) -> Vec<ConfigurationIssue> {
        let mut issues = Vec::new();

        for level in ThresholdLevel::ordered() {
            let count = self.rows.iter().filter(|row| row.level == level).count();
            if count == 0 {
                issues.push(ConfigurationIssue::MissingThresholdLevel { level });
            } else if count > 1 {
                issues.push(ConfigurationIssue::DuplicateThresholdLevel { level });
            }
        }

        for row in &self.rows {
            if !row.trigger_ratio.is_finite() || row.trigger_ratio < 0.0 {
                issues.push(ConfigurationIssue::InvalidTrigger {
                    level: row.level,
                    trigger_ratio: row.trigger_ratio,
                });
            }
        }

        if issues.is_empty() {
            let mut ordered = self.rows.clone();
            ordered.sort_by_key(|row| row.level);
            if ordered
                .windows(2)
                .any(|pair| pair[1].trigger_ratio <= pair[0].trigger_ratio)
            {
                issues.push(ConfigurationIssue::TriggersNotIncreasing);
            }
        }

        issues
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Tag selecting which category a scale row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKey {
    /// Fixed 0.6/0.8/1.0/1.2 performance scale used to score KPIs and goals.
    Performance,
    Role(String),
    GlobalFactor,
}

impl ScaleKey {
    pub fn label(&self) -> &str {
        match self {
            ScaleKey::Performance => "performance",
            ScaleKey::Role(name) => name,
            ScaleKey::GlobalFactor => "global factor",
        }
    }
}

/// Output values for one category at each of the four trigger levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleRow {
    pub key: ScaleKey,
    pub value_at_minimum: f64,
    pub value_at_partial: f64,
    pub value_at_target: f64,
    pub value_at_exceeded: f64,
}

impl ScaleRow {
    pub fn new(key: ScaleKey, values: [f64; 4]) -> Self {
        let [value_at_minimum, value_at_partial, value_at_target, value_at_exceeded] = values;
        Self {
            key,
            value_at_minimum,
            value_at_partial,
            value_at_target,
            value_at_exceeded,
        }
    }

    pub fn performance() -> Self {
        Self::new(ScaleKey::Performance, [0.6, 0.8, 1.0, 1.2])
    }

    pub fn role(name: impl Into<String>, values: [f64; 4]) -> Self {
        Self::new(ScaleKey::Role(name.into()), values)
    }

    pub fn global_factor(values: [f64; 4]) -> Self {
        Self::new(ScaleKey::GlobalFactor, values)
    }

    pub fn value_at(&self, level: ThresholdLevel) -> f64 {
        self.values()[level.index()]
    }

    pub fn values(&self) -> [f64; 4] {
        [
            self.value_at_minimum,
            self.value_at_partial,
            self.value_at_target,
            self.value_at_exceeded,
        ]
    }

    pub fn role_name(&self) -> Option<&str> {
        match &self.key {
            ScaleKey::Role(name) => Some(name),
            _ => None,
        }
    }
}

/// Salary multiples per role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleScaleTable {
    rows: Vec<ScaleRow>,
}

impl RoleScaleTable {
    pub fn new(rows: Vec<ScaleRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScaleRow] {
        &self.rows
    }

    pub fn row_for(&self, role: &str) -> Option<&ScaleRow> {
        self.rows.iter().find(|row| row.role_name() == Some(role))
    }

    pub fn contains(&self, role: &str) -> bool {
        self.row_for(role).is_some()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(ScaleRow::role_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u64);

impl From<u64> for KpiId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for EmployeeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Corporate indicator with its weight in the scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub id: KpiId,
    pub name: String,
    pub weight_percent: u32,
    pub target: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiInput {
    pub name: String,
    pub weight_percent: u32,
    pub target: f64,
    pub actual: f64,
}

impl KpiInput {
    pub(crate) fn into_record(self, id: KpiId) -> Kpi {
        Kpi {
            id,
            name: self.name,
            weight_percent: self.weight_percent,
            target: self.target,
            actual: self.actual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualGoal {
    pub description: String,
    pub weight_percent: u32,
    pub goal: f64,
    pub realized: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: String,
    pub base_salary: f64,
    pub months_active: u8,
    pub individual_performance_score: f64,
    #[serde(default)]
    pub goals: Vec<IndividualGoal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub name: String,
    pub role: String,
    pub base_salary: f64,
    pub months_active: u8,
    #[serde(default = "default_performance_score")]
    pub individual_performance_score: f64,
    #[serde(default)]
    pub goals: Vec<IndividualGoal>,
}

pub(crate) const fn default_performance_score() -> f64 {
    1.0
}

impl EmployeeInput {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        base_salary: f64,
        months_active: u8,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            base_salary,
            months_active,
            individual_performance_score: default_performance_score(),
            goals: Vec::new(),
        }
    }

    pub(crate) fn into_record(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            name: self.name,
            role: self.role,
            base_salary: self.base_salary,
            months_active: self.months_active,
            individual_performance_score: self.individual_performance_score,
            goals: self.goals,
        }
    }
}

/// Non-fatal configuration problems surfaced alongside calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigurationIssue {
    MissingThresholdLevel { level: ThresholdLevel },
    DuplicateThresholdLevel { level: ThresholdLevel },
    InvalidTrigger { level: ThresholdLevel, trigger_ratio: f64 },
    TriggersNotIncreasing,
    WeightMismatch { total_weight: u32 },
    NonPositiveTarget { kpi_id: KpiId, name: String },
    UnknownRole { employee_id: EmployeeId, role: String },
    GoalWeightMismatch { employee_id: EmployeeId, total_weight: u32 },
}

impl ConfigurationIssue {
    pub fn summary(&self) -> String {
        match self {
            ConfigurationIssue::MissingThresholdLevel { level } => {
                format!("threshold level {} is missing; all payouts resolve to 0", level.label())
            }
            ConfigurationIssue::DuplicateThresholdLevel { level } => {
                format!("threshold level {} is defined more than once", level.label())
            }
            ConfigurationIssue::InvalidTrigger {
                level,
                trigger_ratio,
            } => format!(
                "threshold level {} has invalid trigger {}",
                level.label(),
                trigger_ratio
            ),
            ConfigurationIssue::TriggersNotIncreasing => {
                "threshold triggers must increase from Minimum to Exceeded".to_string()
            }
            ConfigurationIssue::WeightMismatch { total_weight } => {
                format!("KPI weights sum to {total_weight}%, expected 100%")
            }
            ConfigurationIssue::NonPositiveTarget { name, .. } => {
                format!("KPI '{name}' has a non-positive target; achievement counts as 0")
            }
            ConfigurationIssue::UnknownRole { employee_id, role } => format!(
                "employee {} references role '{}' with no scale row; multiple resolves to 0",
                employee_id.0, role
            ),
            ConfigurationIssue::GoalWeightMismatch {
                employee_id,
                total_weight,
            } => format!(
                "employee {} goal weights sum to {}%, expected 100%",
                employee_id.0, total_weight
            ),
        }
    }
}
