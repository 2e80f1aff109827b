//! Distribution engine
//!
//! Builds the forecast for a month: what each owner should receive if every
//! unit pays its contracted rent. Regeneration is destructive. The month's
//! forecast rows and all of its wallet entries are wiped and rebuilt inside
//! one transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::aggregation::AggregationService;
use super::allocation::{allocate, Allocation};
use crate::audit::{AuditEntry, EntityType};
use crate::config::Settings;
use crate::error::LedgerResult;
use crate::models::{
    AllocationStatus, EntryType, ExpectedDistributionRecord, ExpenseTreatment, Month,
    NewWalletEntry, OwnerId, RunId,
};
use crate::storage::{DistributionRepository, OwnerRepository, Storage, WalletRepository};

/// Service for generating expected distributions
pub struct DistributionService<'a> {
    storage: &'a Storage,
    treatment: ExpenseTreatment,
}

/// One owner's forecast line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionRow {
    pub owner_id: OwnerId,
    pub owner_name: String,
    pub share_fraction: f64,
    /// Gross share of the expected pool
    pub expected_rent: f64,
    pub expected_expenses: f64,
    pub allowance: f64,
    pub expected_net: f64,
}

/// Outcome of a forecast regeneration
#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub month: Month,
    pub run_id: RunId,
    pub generated_on: DateTime<Utc>,
    pub treatment: ExpenseTreatment,
    pub status: AllocationStatus,
    pub expected_revenue: f64,
    pub total_expenses: f64,
    pub pool_expenses: f64,
    pub distributable: f64,
    pub rows: Vec<DistributionRow>,
    pub wallet_entries: usize,
    /// Wallet entries wiped for the month, actual ones included
    pub wallet_entries_replaced: usize,
}

impl DistributionReport {
    pub fn total_net(&self) -> f64 {
        self.rows.iter().map(|r| r.expected_net).sum()
    }
}

impl<'a> DistributionService<'a> {
    /// Create a service using the configured expense treatment
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self::with_treatment(storage, settings.expense_treatment)
    }

    pub fn with_treatment(storage: &'a Storage, treatment: ExpenseTreatment) -> Self {
        Self { storage, treatment }
    }

    pub fn treatment(&self) -> ExpenseTreatment {
        self.treatment
    }

    /// Regenerate the expected distribution for `month`
    pub fn generate_expected_distribution(&self, month: &Month) -> LedgerResult<DistributionReport> {
        let run_id = RunId::new();
        let generated_on = Utc::now();
        debug!(%month, %run_id, treatment = %self.treatment, "regenerating expected distribution");

        let report = self.storage.in_transaction(|tx| {
            let forecasts = DistributionRepository::new(tx);
            let wallets = WalletRepository::new(tx);

            forecasts.delete_month(month)?;
            let replaced = wallets.delete_month(month)?;

            let agg = AggregationService::with_connection(tx);
            let owners = OwnerRepository::new(tx).get_all()?;
            let expected_revenue = agg.expected_revenue(month)?;
            let allocation = allocate(&agg, &owners, month, expected_revenue, self.treatment)?;

            let mut wallet_entries = 0;
            for slice in &allocation.owners {
                forecasts.insert(&ExpectedDistributionRecord {
                    month: *month,
                    owner_id: slice.owner.id,
                    expected_rent: slice.gross,
                    expected_expenses: slice.owner_expense,
                    expected_net: slice.net,
                    generated_on,
                })?;

                let figures = [
                    (EntryType::ForecastDistribution, slice.gross),
                    (EntryType::ForecastExpense, slice.owner_expense),
                    (EntryType::ForecastAllowance, slice.allowance),
                ];
                for (entry_type, amount) in figures {
                    if let Some(entry) =
                        NewWalletEntry::from_figure(slice.owner.id, *month, entry_type, amount, run_id)
                    {
                        wallets.insert(&entry)?;
                        wallet_entries += 1;
                    }
                }
            }

            Ok(build_report(
                month,
                run_id,
                generated_on,
                expected_revenue,
                allocation,
                wallet_entries,
                replaced,
            ))
        })?;

        match report.status {
            AllocationStatus::NoOwners => warn!(%month, "no owners; nothing distributed"),
            AllocationStatus::ZeroShares => warn!(%month, "all shares are zero; gross shares are zero"),
            AllocationStatus::Computed => {}
        }
        info!(
            %month,
            %run_id,
            owners = report.rows.len(),
            distributable = report.distributable,
            wallet_entries = report.wallet_entries,
            "expected distribution generated"
        );

        self.storage.log_committed(&AuditEntry::regenerate(
            EntityType::ExpectedDistribution,
            month.to_string(),
            &RunSummary::from(&report),
            format!(
                "run {} ({}), {} wallet entries replaced",
                run_id, self.treatment, report.wallet_entries_replaced
            ),
        ));

        Ok(report)
    }

    /// Stored forecast rows for a month
    pub fn stored(&self, month: &Month) -> LedgerResult<Vec<ExpectedDistributionRecord>> {
        self.storage.distributions().find_by_month(month)
    }
}

fn build_report(
    month: &Month,
    run_id: RunId,
    generated_on: DateTime<Utc>,
    expected_revenue: f64,
    allocation: Allocation,
    wallet_entries: usize,
    wallet_entries_replaced: usize,
) -> DistributionReport {
    let rows = allocation
        .owners
        .into_iter()
        .map(|slice| DistributionRow {
            owner_id: slice.owner.id,
            owner_name: slice.owner.name,
            share_fraction: slice.fraction,
            expected_rent: slice.gross,
            expected_expenses: slice.owner_expense,
            allowance: slice.allowance,
            expected_net: slice.net,
        })
        .collect();

    DistributionReport {
        month: *month,
        run_id,
        generated_on,
        treatment: allocation.treatment,
        status: allocation.status,
        expected_revenue,
        total_expenses: allocation.total_expenses,
        pool_expenses: allocation.pool_expenses,
        distributable: allocation.distributable,
        rows,
        wallet_entries,
        wallet_entries_replaced,
    }
}

/// Compact record of a run for the audit log
#[derive(Serialize)]
struct RunSummary {
    run_id: RunId,
    status: AllocationStatus,
    owners: usize,
    income: f64,
    distributable: f64,
    wallet_entries: usize,
}

impl From<&DistributionReport> for RunSummary {
    fn from(report: &DistributionReport) -> Self {
        Self {
            run_id: report.run_id,
            status: report.status,
            owners: report.rows.len(),
            income: report.expected_revenue,
            distributable: report.distributable,
            wallet_entries: report.wallet_entries,
        }
    }
}
