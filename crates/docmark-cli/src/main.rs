//! docmark command-line entry point.

mod cli;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docmark_core::batch::{AlwaysChanged, DirectoryBackupStore, JsonFileTracker, MarkdownDirectory};
use docmark_core::traits::ChangeTracker;
use docmark_core::{AppConfig, BatchOptions, BatchRunner, Converter, EmptyLineConfig};

use crate::cli::{CliArgs, Command};

fn init_tracing(json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    // stdout carries converted Markdown
    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

fn load_config(path: &Path) -> Result<AppConfig> {
    let config = AppConfig::from_file(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Ok(config.with_env_overrides())
}

fn convert(file: &Path, config: Option<&Path>) -> Result<()> {
    let converter = match config {
        Some(path) => Converter::from_app_config(&load_config(path)?),
        None => Converter::new(EmptyLineConfig::DEFAULT),
    };

    let markdown = converter
        .convert(file)
        .with_context(|| format!("failed to convert {}", file.display()))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{markdown}")?;
    Ok(())
}

fn batch(config: &Path, force: bool, output: &Path, retention_days: u32) -> Result<()> {
    let config = load_config(config)?;

    let tracker: Box<dyn ChangeTracker> = if force {
        Box::new(AlwaysChanged)
    } else {
        Box::new(
            JsonFileTracker::in_folder(&config.input_folder)
                .context("failed to open file metadata store")?,
        )
    };
    let backups = DirectoryBackupStore::new(&config.backup_folder);
    let uploader = MarkdownDirectory::new(output);

    let mut runner = BatchRunner::new(config, tracker, Box::new(backups), Box::new(uploader))
        .with_options(BatchOptions {
            force,
            backup_retention_days: retention_days,
        });

    let summary = runner.run().context("batch run failed")?;
    tracing::info!(
        total = summary.total,
        processed = summary.processed,
        successes = summary.successes,
        failures = summary.failures,
        "Done"
    );

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&summary)?)?;

    if summary.failures > 0 {
        anyhow::bail!("{} file(s) failed to convert", summary.failures);
    }
    Ok(())
}

fn show_config(config: &Path) -> Result<()> {
    let config = load_config(config)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&config.as_dict())?)?;
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    init_tracing(args.json_logs);

    match args.command {
        Command::Convert { file, config } => convert(&file, config.as_deref()),
        Command::Batch {
            config,
            force,
            output,
            retention_days,
        } => batch(&config, force, &output, retention_days),
        Command::ShowConfig { config } => show_config(&config),
    }
}
