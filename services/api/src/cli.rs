use crate::payroll::{run_payroll_report, run_scorecard_report, PayrollArgs, ScorecardArgs};
use crate::server;
use bonus_sim::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Bonus Simulator",
    about = "Serve the bonus simulator API or run payroll calculations from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute the bonus payroll and print the report
    Payroll(PayrollArgs),
    /// Print the corporate scorecard only
    Scorecard(ScorecardArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Payroll(args) => run_payroll_report(args),
        Command::Scorecard(args) => run_scorecard_report(args),
    }
}
