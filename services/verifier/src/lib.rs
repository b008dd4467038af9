mod cli;
mod commands;
mod infra;
mod render;

use accredit::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
