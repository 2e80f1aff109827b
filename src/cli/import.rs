//! CLI command handler for sheet import
//!
//! Imports one CSV sheet, or every recognised sheet in a directory.

use clap::Args;
use std::path::PathBuf;

use crate::display::format_import_summary;
use crate::error::{LedgerError, LedgerResult};
use crate::services::{ImportService, SheetKind};
use crate::storage::Storage;

/// Arguments for `import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file, or a directory holding one CSV per sheet
    pub path: PathBuf,

    /// Sheet held by the file: owners_shares, units_rents, expenses,
    /// owner_allowance (inferred from the file name when omitted)
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Month the monthly sheets belong to (YYYY-MM); overrides the file
    #[arg(short, long)]
    pub month: Option<String>,
}

/// Handle the import command
pub fn handle_import_command(storage: &Storage, args: ImportArgs) -> LedgerResult<()> {
    let service = ImportService::new(storage);
    let month = args.month.as_deref().map(super::parse_month).transpose()?;

    if !args.path.exists() {
        return Err(LedgerError::Io(format!(
            "File not found: {}",
            args.path.display()
        )));
    }

    let summaries = if args.path.is_dir() {
        if args.sheet.is_some() {
            return Err(LedgerError::Validation(
                "--sheet applies to a single file, not a directory".to_string(),
            ));
        }
        service.import_directory(&args.path, month)?
    } else {
        let kind = args
            .sheet
            .as_deref()
            .map(|s| {
                SheetKind::parse(s).ok_or_else(|| {
                    LedgerError::Validation(format!(
                        "Unknown sheet '{}'. Valid sheets: {}",
                        s,
                        SheetKind::ALL
                            .iter()
                            .map(|k| k.name())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })
            })
            .transpose()?;
        vec![service.import_file(&args.path, kind, month)?]
    };

    println!("{}", format_import_summary(&summaries));
    let inserted: usize = summaries.iter().map(|s| s.inserted).sum();
    println!("Imported {} rows.", inserted);

    Ok(())
}
