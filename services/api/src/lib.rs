mod cli;
mod infra;
mod payroll;
mod routes;
mod server;

use bonus_sim::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
