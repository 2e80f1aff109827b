//! Distribution, variance and summary commands

use clap::Args;

use super::{resolve_month, resolve_treatment};
use crate::config::settings::Settings;
use crate::display::{format_distribution, format_month_summary, format_variance};
use crate::error::LedgerResult;
use crate::services::{AggregationService, DistributionService, VarianceService};
use crate::storage::Storage;

/// Arguments shared by the month-level commands
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Month to process (YYYY-MM); defaults to the latest month with rent data
    pub month: Option<String>,

    /// Expense treatment for this run: pool_inclusive or pool_exclusive
    #[arg(short, long)]
    pub treatment: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Regenerate the expected distribution for a month
pub fn handle_distribute_command(
    storage: &Storage,
    settings: &Settings,
    args: RunArgs,
) -> LedgerResult<()> {
    let month = resolve_month(storage, args.month.as_deref())?;
    let treatment = resolve_treatment(settings, args.treatment.as_deref())?;

    let report = DistributionService::with_treatment(storage, treatment)
        .generate_expected_distribution(&month)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_distribution(&report, &settings.currency_symbol));
    }
    Ok(())
}

/// Regenerate the variance report for a month
pub fn handle_variance_command(
    storage: &Storage,
    settings: &Settings,
    args: RunArgs,
) -> LedgerResult<()> {
    let month = resolve_month(storage, args.month.as_deref())?;
    let treatment = resolve_treatment(settings, args.treatment.as_deref())?;

    let report = VarianceService::with_treatment(storage, treatment).generate_variance(&month)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_variance(&report, &settings.currency_symbol));
    }
    Ok(())
}

/// Show a month's aggregates without writing anything
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    args: RunArgs,
) -> LedgerResult<()> {
    let month = resolve_month(storage, args.month.as_deref())?;
    let treatment = resolve_treatment(settings, args.treatment.as_deref())?;

    let summary = AggregationService::new(storage).month_summary(&month)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!(
            "{}",
            format_month_summary(&summary, treatment, &settings.currency_symbol)
        );
    }
    Ok(())
}
