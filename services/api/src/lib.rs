mod analyze;
mod cli;
mod infra;
mod routes;
mod server;

use consent_engine::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
