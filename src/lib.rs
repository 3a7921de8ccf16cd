pub mod config;
pub mod error;
pub mod infra;
pub mod model;
pub mod policy;
pub mod providers;
pub mod routes;
pub mod telemetry;

mod cli;
mod report;
mod server;

use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
