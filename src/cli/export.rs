//! CLI commands for data export
//!
//! Provides commands for exporting month data in various formats.

use clap::Subcommand;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, LedgerResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export everything stored for a month as JSON
    Json {
        /// Month to export (YYYY-MM)
        month: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export everything stored for a month as YAML
    Yaml {
        /// Month to export (YYYY-MM)
        month: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the owner register to CSV
    Owners {
        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a month's wallet entries, all owners, to CSV
    Wallets {
        /// Month to export (YYYY-MM)
        month: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> LedgerResult<()> {
    match cmd {
        ExportCommands::Json {
            month,
            output,
            pretty,
        } => {
            let month = super::parse_month(&month)?;
            with_output(output.as_deref(), |w| {
                json::export_month_json(storage, &month, w, pretty)?;
                writeln!(w)?;
                Ok(())
            })
        }
        ExportCommands::Yaml { month, output } => {
            let month = super::parse_month(&month)?;
            with_output(output.as_deref(), |w| {
                yaml::export_month_yaml(storage, &month, w)
            })
        }
        ExportCommands::Owners { output } => {
            with_output(output.as_deref(), |w| csv::export_owners_csv(storage, w))
        }
        ExportCommands::Wallets { month, output } => {
            let month = super::parse_month(&month)?;
            with_output(output.as_deref(), |w| {
                csv::export_wallet_entries_csv(storage, &month, w)
            })
        }
    }
}

/// Run `write` against the output file, or stdout when there is none
fn with_output<F>(output: Option<&Path>, write: F) -> LedgerResult<()>
where
    F: FnOnce(&mut dyn Write) -> LedgerResult<()>,
{
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush()?;
            eprintln!("Exported to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write(&mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}
