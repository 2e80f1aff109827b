//! Wallet Ledger Report
//!
//! A per-owner, per-month statement of wallet entries with running balances,
//! carried forward from every earlier month.

use crate::error::LedgerResult;
use crate::models::{round2, Money, Month, Owner};
use crate::services::{WalletService, WalletStatement};
use crate::storage::Storage;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Wallet statement for one owner and month
#[derive(Debug, Clone)]
pub struct WalletLedgerReport {
    pub owner: Owner,
    pub statement: WalletStatement,
}

impl WalletLedgerReport {
    /// Generate the report for an existing owner
    pub fn generate(storage: &Storage, owner: Owner, month: &Month) -> LedgerResult<Self> {
        let statement = WalletService::new(storage).wallet_entries(owner.id, month)?;
        Ok(Self { owner, statement })
    }

    pub fn is_empty(&self) -> bool {
        self.statement.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str, date_format: &str) -> String {
        let money = |v: f64| Money::new(v).format_with_symbol(currency);
        let mut output = String::new();

        output.push_str(&format!(
            "Wallet: {} - {}\n",
            self.owner.name, self.statement.month
        ));
        output.push_str(&"=".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "Opening Balance: {}\n\n",
            money(self.statement.prior_balance)
        ));

        output.push_str(&format!(
            "{:<17} {:<24} {:<34} {:>4} {:>12}\n",
            "Date", "Type", "Description", "Dir", "Balance"
        ));
        output.push_str(&"-".repeat(100));
        output.push('\n');

        for line in &self.statement.lines {
            let entry = &line.entry;
            let description = if entry.description.chars().count() > 32 {
                format!("{}...", entry.description.chars().take(29).collect::<String>())
            } else {
                entry.description.clone()
            };
            output.push_str(&format!(
                "{:<17} {:<24} {:<34} {:>4} {:>12}\n",
                entry.created_on.format(date_format),
                entry.entry_type.tag(),
                description,
                entry.direction,
                money(line.running_balance),
            ));
            output.push_str(&format!("{:>93}\n", money(entry.signed_amount())));
        }

        output.push_str(&"-".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "In: {}  |  Out: {}  |  Closing Balance: {}  |  Entries: {}\n",
            money(self.statement.total_in()),
            money(self.statement.total_out().abs()),
            money(self.statement.ending_balance),
            self.statement.lines.len()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Date",
            "Type",
            "Description",
            "Direction",
            "Amount",
            "Running Balance",
        ])?;

        for line in &self.statement.lines {
            let entry = &line.entry;
            csv.write_record([
                entry.created_on.to_rfc3339(),
                entry.entry_type.tag().to_string(),
                entry.description.clone(),
                entry.direction.to_string(),
                format!("{:.2}", round2(entry.amount)),
                format!("{:.2}", round2(line.running_balance)),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }

    /// File name for this owner and month, spaces replaced by underscores
    pub fn file_name(&self) -> String {
        format!(
            "Wallet_{}_{}.csv",
            self.owner.name.trim().replace(' ', "_"),
            self.statement.month
        )
    }

    /// Write the CSV into `dir`
    ///
    /// Returns `None` without creating a file when the month has no entries.
    pub fn write_to_dir(&self, dir: &Path) -> LedgerResult<Option<PathBuf>> {
        if self.is_empty() {
            return Ok(None);
        }
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let file = std::fs::File::create(&path)?;
        self.export_csv(std::io::BufWriter::new(file))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryType, NewWalletEntry, OwnerId, RunId};

    fn setup() -> (Storage, Owner) {
        let storage = Storage::open_in_memory().unwrap();
        let owner = Owner::new(OwnerId::new(1), "Amal Haddad", 60.0);
        storage.owners().insert(&owner).unwrap();
        (storage, owner)
    }

    fn append(storage: &Storage, m: &str, entry_type: EntryType, amount: f64) {
        let entry = NewWalletEntry::from_figure(
            OwnerId::new(1),
            Month::parse(m).unwrap(),
            entry_type,
            amount,
            RunId::new(),
        )
        .unwrap();
        storage.wallets().insert(&entry).unwrap();
    }

    #[test]
    fn test_empty_month_writes_nothing() {
        let (storage, owner) = setup();
        let month = Month::parse("2024-02").unwrap();
        let report = WalletLedgerReport::generate(&storage, owner, &month).unwrap();
        assert!(report.is_empty());

        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(report.write_to_dir(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_running_balance_in_csv() {
        let (storage, owner) = setup();
        append(&storage, "2024-01", EntryType::ForecastDistribution, 1000.0);
        append(&storage, "2024-02", EntryType::ForecastDistribution, 6000.0);
        append(&storage, "2024-02", EntryType::ForecastExpense, 500.0);

        let month = Month::parse("2024-02").unwrap();
        let report = WalletLedgerReport::generate(&storage, owner, &month).unwrap();
        assert_eq!(report.file_name(), "Wallet_Amal_Haddad_2024-02.csv");

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].ends_with("Expected distribution,in,6000.00,7000.00"));
        assert!(rows[2].ends_with("out,500.00,6500.00"));
    }

    #[test]
    fn test_format_terminal_shows_balances() {
        let (storage, owner) = setup();
        append(&storage, "2024-01", EntryType::ForecastDistribution, 250.0);
        let month = Month::parse("2024-01").unwrap();
        let report = WalletLedgerReport::generate(&storage, owner, &month).unwrap();
        let text = report.format_terminal("$", "%Y-%m-%d %H:%M");
        assert!(text.contains("Wallet: Amal Haddad - 2024-01"));
        assert!(text.contains("Closing Balance: $250.00"));
    }
}
