use bonus_sim::config::AppConfig;
use bonus_sim::error::AppError;
use bonus_sim::workflows::bonus::{
    render_payroll, render_scorecard, run_payroll, write_payroll_csv, BonusTables,
    CalculationSettings, CorporateAxis, InterpolationPolicy, ScenarioLoader,
};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub(crate) struct PayrollArgs {
    /// JSON scenario file with the tables to calculate (defaults to the seeded session)
    #[arg(long)]
    pub(crate) scenario: Option<PathBuf>,
    /// Interpolation policy: linear or step (defaults to BONUS_POLICY or linear)
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<InterpolationPolicy>,
    /// Role lookup axis: score or achievement (defaults to BONUS_CORPORATE_AXIS or score)
    #[arg(long, value_parser = parse_axis)]
    pub(crate) corporate_axis: Option<CorporateAxis>,
    /// Also write the payroll rows to this CSV file
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScorecardArgs {
    /// JSON scenario file with the tables to calculate (defaults to the seeded session)
    #[arg(long)]
    pub(crate) scenario: Option<PathBuf>,
}

fn parse_policy(raw: &str) -> Result<InterpolationPolicy, String> {
    InterpolationPolicy::parse(raw)
        .ok_or_else(|| format!("unknown policy '{raw}' (use linear or step)"))
}

fn parse_axis(raw: &str) -> Result<CorporateAxis, String> {
    CorporateAxis::parse(raw)
        .ok_or_else(|| format!("unknown corporate axis '{raw}' (use score or achievement)"))
}

pub(crate) fn load_tables(scenario: Option<&Path>) -> Result<BonusTables, AppError> {
    match scenario {
        Some(path) => Ok(ScenarioLoader::from_path(path)?),
        None => Ok(BonusTables::seeded()),
    }
}

/// CLI flags win over the environment, which wins over the defaults.
pub(crate) fn resolve_settings(
    args: &PayrollArgs,
    configured: CalculationSettings,
) -> CalculationSettings {
    CalculationSettings {
        policy: args.policy.unwrap_or(configured.policy),
        corporate_axis: args.corporate_axis.unwrap_or(configured.corporate_axis),
    }
}

pub(crate) fn run_payroll_report(args: PayrollArgs) -> Result<(), AppError> {
    let configured = configured_settings()?;
    let tables = load_tables(args.scenario.as_deref())?;
    let run = run_payroll(&tables, resolve_settings(&args, configured));

    print!("{}", render_payroll(&run));

    if let Some(path) = args.csv_out.as_deref() {
        let file = std::fs::File::create(path)?;
        write_payroll_csv(&run, file)?;
        println!("Payroll rows written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_scorecard_report(args: ScorecardArgs) -> Result<(), AppError> {
    let tables = load_tables(args.scenario.as_deref())?;
    let run = run_payroll(&tables, CalculationSettings::default());
    print!("{}", render_scorecard(&run.corporate, &run.issues));
    Ok(())
}

fn configured_settings() -> Result<CalculationSettings, AppError> {
    Ok(AppConfig::load()?.bonus.calculation)
}
