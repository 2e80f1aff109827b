//! Variance engine
//!
//! Re-runs the apportionment on rent actually collected and compares each
//! owner's actual net with the stored forecast. Actual wallet entries are
//! appended alongside the month's forecast entries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::aggregation::AggregationService;
use super::allocation::allocate;
use crate::audit::{AuditEntry, EntityType};
use crate::config::Settings;
use crate::error::LedgerResult;
use crate::models::{
    AllocationStatus, EntryType, ExpenseTreatment, Month, NewWalletEntry, OwnerId, RunId,
    VarianceRecord,
};
use crate::storage::{
    DistributionRepository, OwnerRepository, Storage, VarianceRepository, WalletRepository,
};

/// Service for generating forecast-vs-actual variance
pub struct VarianceService<'a> {
    storage: &'a Storage,
    treatment: ExpenseTreatment,
}

/// One owner's variance line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceRow {
    pub owner_id: OwnerId,
    pub owner_name: String,
    /// Stored forecast net, 0 when the month was never forecast
    pub expected_net: f64,
    pub actual_gross: f64,
    pub actual_expenses: f64,
    pub allowance: f64,
    pub actual_net: f64,
    /// actual_net - expected_net
    pub variance: f64,
}

/// Outcome of a variance run
#[derive(Debug, Clone, Serialize)]
pub struct VarianceReport {
    pub month: Month,
    pub run_id: RunId,
    pub generated_on: DateTime<Utc>,
    pub treatment: ExpenseTreatment,
    pub status: AllocationStatus,
    pub total_paid: f64,
    pub total_expenses: f64,
    pub distributable: f64,
    pub rows: Vec<VarianceRow>,
    pub wallet_entries: usize,
}

impl VarianceReport {
    pub fn total_variance(&self) -> f64 {
        self.rows.iter().map(|r| r.variance).sum()
    }
}

impl<'a> VarianceService<'a> {
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self::with_treatment(storage, settings.expense_treatment)
    }

    pub fn with_treatment(storage: &'a Storage, treatment: ExpenseTreatment) -> Self {
        Self { storage, treatment }
    }

    /// Regenerate the variance report for `month`
    ///
    /// Replaces the month's variance rows. Wallet entries are appended, never
    /// cleared, so running this twice records the actual figures twice.
    pub fn generate_variance(&self, month: &Month) -> LedgerResult<VarianceReport> {
        let run_id = RunId::new();
        let generated_on = Utc::now();
        debug!(%month, %run_id, treatment = %self.treatment, "generating variance");

        let report = self.storage.in_transaction(|tx| {
            let variances = VarianceRepository::new(tx);
            let wallets = WalletRepository::new(tx);
            variances.delete_month(month)?;

            let expected: HashMap<OwnerId, f64> = DistributionRepository::new(tx)
                .find_by_month(month)?
                .into_iter()
                .map(|r| (r.owner_id, r.expected_net))
                .collect();

            let agg = AggregationService::with_connection(tx);
            let owners = OwnerRepository::new(tx).get_all()?;
            let total_paid = agg.total_paid(month)?;
            let allocation = allocate(&agg, &owners, month, total_paid, self.treatment)?;

            let mut rows = Vec::with_capacity(allocation.owners.len());
            let mut wallet_entries = 0;
            for slice in allocation.owners {
                let expected_net = expected.get(&slice.owner.id).copied().unwrap_or(0.0);
                let variance = slice.net - expected_net;

                variances.insert(&VarianceRecord {
                    month: *month,
                    owner_id: slice.owner.id,
                    expected_net,
                    actual_net: slice.net,
                    variance,
                    generated_on,
                })?;

                let figures = [
                    (EntryType::ActualDistribution, slice.gross),
                    (EntryType::ActualExpense, slice.owner_expense),
                    (EntryType::ActualAllowance, slice.allowance),
                ];
                for (entry_type, amount) in figures {
                    if let Some(entry) =
                        NewWalletEntry::from_figure(slice.owner.id, *month, entry_type, amount, run_id)
                    {
                        wallets.insert(&entry)?;
                        wallet_entries += 1;
                    }
                }

                rows.push(VarianceRow {
                    owner_id: slice.owner.id,
                    owner_name: slice.owner.name,
                    expected_net,
                    actual_gross: slice.gross,
                    actual_expenses: slice.owner_expense,
                    allowance: slice.allowance,
                    actual_net: slice.net,
                    variance,
                });
            }

            Ok(VarianceReport {
                month: *month,
                run_id,
                generated_on,
                treatment: self.treatment,
                status: allocation.status,
                total_paid,
                total_expenses: allocation.total_expenses,
                distributable: allocation.distributable,
                rows,
                wallet_entries,
            })
        })?;

        info!(
            %month,
            %run_id,
            owners = report.rows.len(),
            total_paid = report.total_paid,
            total_variance = report.total_variance(),
            "variance generated"
        );

        self.storage.log_committed(&AuditEntry::regenerate(
            EntityType::VarianceReport,
            month.to_string(),
            &report.rows,
            format!("run {} ({}), status {:?}", run_id, self.treatment, report.status),
        ));

        Ok(report)
    }

    /// Stored variance rows for a month
    pub fn stored(&self, month: &Month) -> LedgerResult<Vec<VarianceRecord>> {
        self.storage.variances().find_by_month(month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLogger;
    use crate::models::{Expense, Owner, RentRecord};
    use crate::services::DistributionService;
    use tempfile::TempDir;

    fn month(s: &str) -> Month {
        Month::parse(s).unwrap()
    }

    fn create_test_storage() -> Storage {
        let storage = Storage::open_in_memory().unwrap();
        let jan = month("2024-01");
        storage.owners().insert(&Owner::new(OwnerId::new(1), "A", 60.0)).unwrap();
        storage.owners().insert(&Owner::new(OwnerId::new(2), "B", 40.0)).unwrap();
        storage.rents().insert(&RentRecord::new(jan, "U1", "T1", 6000.0, 6000.0)).unwrap();
        storage.rents().insert(&RentRecord::new(jan, "U2", "T2", 4000.0, 3000.0)).unwrap();
        storage.expenses().insert(&Expense::shared(jan, "Elevator", 2000.0)).unwrap();
        storage
    }

    #[test]
    fn test_variance_after_partial_payment() {
        let storage = create_test_storage();
        let jan = month("2024-01");
        DistributionService::with_treatment(&storage, ExpenseTreatment::default())
            .generate_expected_distribution(&jan)
            .unwrap();

        let report = VarianceService::with_treatment(&storage, ExpenseTreatment::default())
            .generate_variance(&jan)
            .unwrap();

        assert_eq!(report.total_paid, 9000.0);
        assert_eq!(report.distributable, 7000.0);
        assert_eq!(report.rows[0].actual_net, 4200.0);
        assert_eq!(report.rows[0].variance, -600.0);
        assert_eq!(report.rows[1].actual_net, 2800.0);
        assert_eq!(report.rows[1].variance, -400.0);
        assert_eq!(report.wallet_entries, 2);

        // Forecast entries are kept; actual entries come on top
        assert_eq!(storage.wallets().count_for_month(&jan).unwrap(), 4);
    }

    #[test]
    fn test_missing_forecast_defaults_to_zero() {
        let storage = create_test_storage();
        let jan = month("2024-01");

        let report = VarianceService::with_treatment(&storage, ExpenseTreatment::default())
            .generate_variance(&jan)
            .unwrap();

        assert_eq!(report.rows[0].expected_net, 0.0);
        assert_eq!(report.rows[0].variance, report.rows[0].actual_net);
    }

    #[test]
    fn test_rerun_replaces_rows_and_appends_entries() {
        let storage = create_test_storage();
        let jan = month("2024-01");
        let service = VarianceService::with_treatment(&storage, ExpenseTreatment::default());

        service.generate_variance(&jan).unwrap();
        service.generate_variance(&jan).unwrap();

        assert_eq!(service.stored(&jan).unwrap().len(), 2);
        assert_eq!(storage.wallets().count_for_month(&jan).unwrap(), 4);
    }

    #[test]
    fn test_audit_failure_does_not_fail_committed_run() {
        let temp_dir = TempDir::new().unwrap();
        let storage = create_test_storage()
            .with_audit_log(AuditLogger::new(temp_dir.path().join("missing").join("audit.log")));
        let jan = month("2024-01");

        let report = VarianceService::with_treatment(&storage, ExpenseTreatment::default())
            .generate_variance(&jan)
            .unwrap();

        assert_eq!(report.wallet_entries, 2);
        assert_eq!(storage.variances().find_by_month(&jan).unwrap().len(), 2);
    }
}
