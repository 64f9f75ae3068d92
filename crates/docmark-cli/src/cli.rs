//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Convert office documents to normalized Markdown.
#[derive(Parser, Debug)]
#[command(name = "docmark", version, about)]
pub struct CliArgs {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert one file and print the Markdown to stdout.
    Convert {
        /// File to convert.
        file: PathBuf,

        /// Configuration file (json, yaml or toml).
        #[arg(short, long, env = "DOCMARK_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Convert every changed file of the configured input folder.
    Batch {
        /// Configuration file (json, yaml or toml).
        config: PathBuf,

        /// Process all files, ignoring recorded metadata.
        #[arg(short, long)]
        force: bool,

        /// Directory the Markdown documents are written to.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Backups older than this many days are removed.
        #[arg(long, default_value_t = docmark_core::batch::DEFAULT_BACKUP_RETENTION_DAYS)]
        retention_days: u32,
    },

    /// Print the resolved configuration as JSON.
    ShowConfig {
        /// Configuration file (json, yaml or toml).
        config: PathBuf,
    },
}
