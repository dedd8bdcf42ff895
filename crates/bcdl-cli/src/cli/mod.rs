//! CLI for bcdl.

mod commands;

use anyhow::Result;
use bcdl_core::format::FileType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_download, run_fingerprint, run_formats, run_history, RunArgs};

/// Top-level CLI for bcdl.
#[derive(Debug, Parser)]
#[command(name = "bcdl")]
#[command(about = "bcdl: bulk downloader for a purchased music collection", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every album of the collection not downloaded before.
    Run {
        /// Collection owner's username.
        #[arg(long)]
        user: String,
        /// Value of the storefront's `identity` session cookie.
        #[arg(long)]
        identity: String,
        /// Directory albums are saved to.
        #[arg(long, short = 'o', value_name = "DIR")]
        output: PathBuf,
        /// File type to download (see `bcdl formats`).
        /// Defaults to the config's default_format, then mp3-320.
        #[arg(long, short = 'f')]
        format: Option<FileType>,
        /// Only download albums whose title matches this text.
        #[arg(long, default_value = "")]
        filter: String,
        /// JSON manifest describing the collection.
        #[arg(long, value_name = "PATH")]
        manifest: PathBuf,
        /// Concurrent downloads (overrides config).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
    },

    /// Inspect the download history of an output directory.
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },

    /// List supported file types.
    Formats,

    /// Print the history fingerprint of an album in a file type.
    Fingerprint {
        /// Album title as listed in the collection.
        title: String,
        #[arg(long, short = 'f')]
        format: FileType,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Number of recorded downloads.
    Count {
        #[arg(long, short = 'o', value_name = "DIR")]
        output: PathBuf,
    },
    /// Whether an album in a file type is recorded.
    Check {
        title: String,
        #[arg(long, short = 'f')]
        format: FileType,
        #[arg(long, short = 'o', value_name = "DIR")]
        output: PathBuf,
    },
    /// Print every recorded fingerprint.
    List {
        #[arg(long, short = 'o', value_name = "DIR")]
        output: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                user,
                identity,
                output,
                format,
                filter,
                manifest,
                workers,
            } => {
                run_download(RunArgs {
                    user,
                    identity,
                    output,
                    format,
                    filter,
                    manifest,
                    workers,
                })
                .await?
            }
            CliCommand::History { action } => run_history(action)?,
            CliCommand::Formats => run_formats(),
            CliCommand::Fingerprint { title, format } => run_fingerprint(&title, format),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
