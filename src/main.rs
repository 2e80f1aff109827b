use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use rentshare::cli::{
    handle_distribute_command, handle_export_command, handle_import_command,
    handle_owner_command, handle_report_command, handle_summary_command,
    handle_variance_command, handle_wallet_command, ExportCommands, ImportArgs, OwnerCommands,
    ReportArgs, RunArgs, WalletArgs,
};
use rentshare::config::{paths::LedgerPaths, settings::Settings};
use rentshare::models::ExpenseTreatment;
use rentshare::storage::Storage;

#[derive(Parser)]
#[command(
    name = "rentshare",
    version,
    about = "Rent distribution and owner wallet ledger",
    long_about = "rentshare splits a co-owned building's monthly rent among its owners. \
                  It forecasts each owner's net distribution, compares it with rent \
                  actually collected, and keeps a running wallet ledger per owner."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Show or change configuration
    Config {
        /// Default expense treatment: pool_inclusive or pool_exclusive
        #[arg(long)]
        treatment: Option<String>,
        /// Currency symbol used in output
        #[arg(long)]
        currency: Option<String>,
        /// Building name shown in reports
        #[arg(long)]
        building: Option<String>,
    },

    /// Owner management commands
    #[command(subcommand)]
    Owner(OwnerCommands),

    /// Import CSV sheets
    Import(ImportArgs),

    /// Regenerate the expected distribution for a month
    #[command(alias = "forecast")]
    Distribute(RunArgs),

    /// Regenerate the variance report for a month
    Variance(RunArgs),

    /// Show an owner's wallet ledger
    Wallet(WalletArgs),

    /// Show a month's totals
    Summary(RunArgs),

    /// Show or export the month report
    Report(ReportArgs),

    /// Export month data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    rentshare::logging::init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("rentshare - rent distribution ledger");
        println!();
        println!("Run 'rentshare --help' for usage information.");
        println!("Run 'rentshare init' to set up a new ledger.");
        return Ok(());
    };

    // Initialize storage
    let storage = Storage::new(&paths)?;

    match command {
        Commands::Init => {
            println!("Initializing rentshare at: {}", paths.base_dir().display());
            settings.setup_completed = true;
            settings.save(&paths)?;

            let missing = storage.missing_tables()?;
            if !missing.is_empty() {
                bail!("Database is missing tables: {}", missing.join(", "));
            }
            println!("Database:  {}", paths.database_file().display());
            println!("Reports:   {}", paths.reports_dir().display());
            println!("Initialization complete!");
            println!();
            println!("Next: import the owners_shares sheet with 'rentshare import <file>'.");
        }
        Commands::Config {
            treatment,
            currency,
            building,
        } => {
            let changed = treatment.is_some() || currency.is_some() || building.is_some();
            if let Some(t) = treatment {
                settings.expense_treatment = match ExpenseTreatment::parse(&t) {
                    Some(t) => t,
                    None => bail!(
                        "Invalid expense treatment: '{}'. Valid values: pool_inclusive, pool_exclusive",
                        t
                    ),
                };
            }
            if let Some(c) = currency {
                settings.currency_symbol = c;
            }
            if let Some(b) = building {
                settings.building_name = b;
            }
            if changed {
                settings.save(&paths)?;
                println!("Configuration saved.");
                println!();
            }

            println!("rentshare Configuration");
            println!("=======================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Database:          {}", paths.database_file().display());
            println!("Reports directory: {}", paths.reports_dir().display());
            println!("Audit log:         {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Building:          {}", settings.building_name);
            println!("  Expense treatment: {}", settings.expense_treatment);
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Admin user:        {}", settings.admin.username);
            println!("  Admin secret:      {}", settings.admin.masked_secret());
            println!("  Token lifetime:    {} min", settings.admin.token_ttl_minutes);
        }
        Commands::Owner(cmd) => handle_owner_command(&storage, cmd)?,
        Commands::Import(args) => handle_import_command(&storage, args)?,
        Commands::Distribute(args) => handle_distribute_command(&storage, &settings, args)?,
        Commands::Variance(args) => handle_variance_command(&storage, &settings, args)?,
        Commands::Wallet(args) => handle_wallet_command(&storage, &paths, &settings, args)?,
        Commands::Summary(args) => handle_summary_command(&storage, &settings, args)?,
        Commands::Report(args) => handle_report_command(&storage, &paths, &settings, args)?,
        Commands::Export(cmd) => handle_export_command(&storage, cmd)?,
        Commands::Audit { count } => match storage.audit_logger() {
            Some(logger) => {
                let entries = logger.read_recent(count)?;
                if entries.is_empty() {
                    println!("Audit log is empty.");
                }
                for entry in entries {
                    println!("{}", entry.format_human_readable());
                }
            }
            None => println!("Audit logging is not enabled."),
        },
    }

    Ok(())
}
