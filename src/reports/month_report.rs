//! Month Report
//!
//! Joins the stored expected distribution and variance snapshots for a month
//! with owner names. Reads only; regenerate the month first to refresh it.

use crate::error::LedgerResult;
use crate::models::{round2, Money, Month, OwnerId};
use crate::storage::Storage;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One owner's line in the month report
#[derive(Debug, Clone, PartialEq)]
pub struct MonthReportRow {
    pub owner_id: OwnerId,
    pub owner_name: String,
    pub expected_rent: Option<f64>,
    pub expected_expenses: Option<f64>,
    pub expected_net: Option<f64>,
    pub actual_net: Option<f64>,
    pub variance: Option<f64>,
}

/// Stored forecast and variance figures for one month
#[derive(Debug, Clone)]
pub struct MonthReport {
    pub month: Month,
    pub rows: Vec<MonthReportRow>,
    /// Owners present in the expected distribution
    pub forecast_owners: usize,
    /// Owners present in the variance report
    pub variance_owners: usize,
}

impl MonthReport {
    /// Build the report from stored snapshots
    ///
    /// Rows referencing owners that no longer exist are left out.
    pub fn generate(storage: &Storage, month: &Month) -> LedgerResult<Self> {
        let names: HashMap<OwnerId, String> = storage
            .owners()
            .get_all()?
            .into_iter()
            .map(|o| (o.id, o.name))
            .collect();

        let mut rows: BTreeMap<OwnerId, MonthReportRow> = BTreeMap::new();
        let mut forecast_owners = 0;
        let mut variance_owners = 0;

        for record in storage.distributions().find_by_month(month)? {
            let Some(name) = names.get(&record.owner_id) else {
                debug!(owner = %record.owner_id, %month, "skipping forecast row for unknown owner");
                continue;
            };
            forecast_owners += 1;
            let row = rows
                .entry(record.owner_id)
                .or_insert_with(|| empty_row(record.owner_id, name));
            row.expected_rent = Some(record.expected_rent);
            row.expected_expenses = Some(record.expected_expenses);
            row.expected_net = Some(record.expected_net);
        }

        for record in storage.variances().find_by_month(month)? {
            let Some(name) = names.get(&record.owner_id) else {
                debug!(owner = %record.owner_id, %month, "skipping variance row for unknown owner");
                continue;
            };
            variance_owners += 1;
            let row = rows
                .entry(record.owner_id)
                .or_insert_with(|| empty_row(record.owner_id, name));
            if row.expected_net.is_none() {
                row.expected_net = Some(record.expected_net);
            }
            row.actual_net = Some(record.actual_net);
            row.variance = Some(record.variance);
        }

        Ok(Self {
            month: *month,
            rows: rows.into_values().collect(),
            forecast_owners,
            variance_owners,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_expected_net(&self) -> f64 {
        self.rows.iter().filter_map(|r| r.expected_net).sum()
    }

    pub fn total_variance(&self) -> f64 {
        self.rows.iter().filter_map(|r| r.variance).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Month Report: {}\n", self.month));
        output.push_str(&"=".repeat(96));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No distribution or variance has been generated for this month.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<20} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
            "Owner", "Exp. Rent", "Exp. Expenses", "Exp. Net", "Actual Net", "Variance"
        ));
        output.push_str(&"-".repeat(96));
        output.push('\n');

        for row in &self.rows {
            let name = if row.owner_name.chars().count() > 18 {
                format!("{}...", row.owner_name.chars().take(15).collect::<String>())
            } else {
                row.owner_name.clone()
            };
            output.push_str(&format!(
                "{:<20} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
                name,
                cell(row.expected_rent, currency),
                cell(row.expected_expenses, currency),
                cell(row.expected_net, currency),
                cell(row.actual_net, currency),
                cell(row.variance, currency),
            ));
        }

        output.push_str(&"-".repeat(96));
        output.push('\n');
        output.push_str(&format!(
            "Total expected net: {}  |  Total variance: {}  |  Owners: {}\n",
            Money::new(self.total_expected_net()).format_with_symbol(currency),
            Money::new(self.total_variance()).format_with_symbol(currency),
            self.rows.len()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Month",
            "Owner Id",
            "Owner",
            "Expected Rent",
            "Expected Expenses",
            "Expected Net",
            "Actual Net",
            "Variance",
        ])?;

        for row in &self.rows {
            csv.write_record([
                self.month.to_string(),
                row.owner_id.to_string(),
                row.owner_name.clone(),
                csv_amount(row.expected_rent),
                csv_amount(row.expected_expenses),
                csv_amount(row.expected_net),
                csv_amount(row.actual_net),
                csv_amount(row.variance),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }

    /// Default file name inside the reports directory
    pub fn file_name(month: &Month) -> String {
        format!("rentshare_report_{}.csv", month)
    }

    /// Write the CSV into `dir`, returning the path and the forecast owner count
    pub fn write_to_dir(&self, dir: &Path) -> LedgerResult<(PathBuf, usize)> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(Self::file_name(&self.month));
        let file = std::fs::File::create(&path)?;
        self.export_csv(std::io::BufWriter::new(file))?;
        Ok((path, self.forecast_owners))
    }
}

fn empty_row(owner_id: OwnerId, name: &str) -> MonthReportRow {
    MonthReportRow {
        owner_id,
        owner_name: name.to_string(),
        expected_rent: None,
        expected_expenses: None,
        expected_net: None,
        actual_net: None,
        variance: None,
    }
}

fn cell(value: Option<f64>, currency: &str) -> String {
    value
        .map(|v| Money::new(v).format_with_symbol(currency))
        .unwrap_or_else(|| "-".to_string())
}

fn csv_amount(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", round2(v)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseTreatment, Owner, RentRecord};
    use crate::services::{DistributionService, VarianceService};

    fn seeded() -> (Storage, Month) {
        let storage = Storage::open_in_memory().unwrap();
        let month = Month::parse("2024-01").unwrap();
        storage
            .owners()
            .insert(&Owner::new(OwnerId::new(1), "Amal Haddad", 60.0))
            .unwrap();
        storage
            .owners()
            .insert(&Owner::new(OwnerId::new(2), "Karim", 40.0))
            .unwrap();
        storage
            .rents()
            .insert(&RentRecord::new(month, "A1", "Tenant", 10000.0, 9000.0))
            .unwrap();
        (storage, month)
    }

    #[test]
    fn test_empty_month() {
        let (storage, month) = seeded();
        let report = MonthReport::generate(&storage, &month).unwrap();
        assert!(report.is_empty());
        assert!(report.format_terminal("$").contains("No distribution"));
    }

    #[test]
    fn test_joins_forecast_and_variance() {
        let (storage, month) = seeded();
        DistributionService::with_treatment(&storage, ExpenseTreatment::PoolInclusive)
            .generate_expected_distribution(&month)
            .unwrap();
        VarianceService::with_treatment(&storage, ExpenseTreatment::PoolInclusive)
            .generate_variance(&month)
            .unwrap();

        let report = MonthReport::generate(&storage, &month).unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.forecast_owners, 2);

        let amal = &report.rows[0];
        assert_eq!(amal.owner_name, "Amal Haddad");
        assert_eq!(amal.expected_net, Some(6000.0));
        assert_eq!(amal.actual_net, Some(5400.0));
        assert_eq!(amal.variance, Some(-600.0));
        assert!((report.total_variance() + 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_export_csv() {
        let (storage, month) = seeded();
        DistributionService::with_treatment(&storage, ExpenseTreatment::PoolInclusive)
            .generate_expected_distribution(&month)
            .unwrap();

        let report = MonthReport::generate(&storage, &month).unwrap();
        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Month,Owner Id,Owner,Expected Rent,Expected Expenses,Expected Net,Actual Net,Variance"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-01,1,Amal Haddad,6000.00,0.00,6000.00,,"
        );
    }

    #[test]
    fn test_write_to_dir() {
        let (storage, month) = seeded();
        DistributionService::with_treatment(&storage, ExpenseTreatment::PoolInclusive)
            .generate_expected_distribution(&month)
            .unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let report = MonthReport::generate(&storage, &month).unwrap();
        let (path, owners) = report.write_to_dir(dir.path()).unwrap();
        assert_eq!(owners, 2);
        assert!(path.ends_with("rentshare_report_2024-01.csv"));
        assert!(path.exists());
    }
}
