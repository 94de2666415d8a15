use anyhow::Context;
use clap::Parser;

pub mod api;
pub mod app;
mod commands;
pub mod error;
pub mod logs;
pub mod models;
pub mod selection;
pub mod storage;
pub mod util;
pub mod view_model;

pub use commands::Cli;

/// Command-line entry point: parse arguments, set up logging, run the command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = util::resolve_data_dir(cli.data_dir.as_deref())
        .context("Cannot determine a data directory; pass --data-dir")?;

    if let Some(log_path) = logs::init_logging(&data_dir).await {
        tracing::debug!(path = %log_path.display(), "Logging to file");
    }
    tracing::info!(data_dir = %data_dir.display(), "Starting");

    let app = app::App::new(data_dir);
    commands::dispatch(cli.command, &app).await?;
    Ok(())
}
