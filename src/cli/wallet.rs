//! Wallet ledger commands

use clap::Args;

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::LedgerResult;
use crate::reports::WalletLedgerReport;
use crate::services::{OwnerService, WalletService};
use crate::storage::Storage;

/// Arguments for `wallet`
#[derive(Args, Debug)]
pub struct WalletArgs {
    /// Owner name or ID
    pub owner: String,

    /// Month to show (YYYY-MM); defaults to the latest month with rent data
    pub month: Option<String>,

    /// Show every month with activity instead of one
    #[arg(short, long, conflicts_with = "month")]
    pub all: bool,

    /// Also write the statement as CSV into the reports directory
    #[arg(short, long)]
    pub export: bool,
}

/// Handle the wallet command
pub fn handle_wallet_command(
    storage: &Storage,
    paths: &LedgerPaths,
    settings: &Settings,
    args: WalletArgs,
) -> LedgerResult<()> {
    let owner = OwnerService::new(storage).require(&args.owner)?;

    let months = if args.all {
        WalletService::new(storage).owner_months(owner.id)?
    } else {
        vec![super::resolve_month(storage, args.month.as_deref())?]
    };

    if months.is_empty() {
        println!("No wallet activity for {}.", owner.name);
        return Ok(());
    }

    for month in months {
        let report = WalletLedgerReport::generate(storage, owner.clone(), &month)?;
        print!(
            "{}",
            report.format_terminal(&settings.currency_symbol, &settings.date_format)
        );

        if args.export {
            match report.write_to_dir(&paths.reports_dir())? {
                Some(path) => println!("Wallet ledger exported to: {}", path.display()),
                None => println!("No entries for {}; nothing exported.", month),
            }
        }
        println!();
    }

    Ok(())
}
