//! CLI command for the month report

use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::reports::MonthReport;
use crate::storage::Storage;

/// Arguments for `report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Month to report on (YYYY-MM); defaults to the latest month with rent data
    pub month: Option<String>,

    /// Export to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export to the reports directory under the default file name
    #[arg(long, conflicts_with = "output")]
    pub save: bool,
}

/// Handle the report command
pub fn handle_report_command(
    storage: &Storage,
    paths: &LedgerPaths,
    settings: &Settings,
    args: ReportArgs,
) -> LedgerResult<()> {
    let month = super::resolve_month(storage, args.month.as_deref())?;
    let report = MonthReport::generate(storage, &month)?;

    print!("{}", report.format_terminal(&settings.currency_symbol));

    if let Some(output) = args.output {
        let file = File::create(&output).map_err(|e| {
            LedgerError::Export(format!(
                "Failed to create file {}: {}",
                output.display(),
                e
            ))
        })?;
        report.export_csv(BufWriter::new(file))?;
        println!("Report exported to: {}", output.display());
    } else if args.save {
        let (path, owners) = report.write_to_dir(&paths.reports_dir())?;
        println!("Report for {} owners exported to: {}", owners, path.display());
    }

    Ok(())
}
