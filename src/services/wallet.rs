//! Wallet ledger service
//!
//! Replays an owner's append-only wallet log into a monthly statement with
//! running balances. Balances are derived on every read.

use serde::Serialize;

use crate::error::LedgerResult;
use crate::models::{Month, OwnerId, WalletEntry};
use crate::storage::Storage;

/// Service for reading wallet statements
pub struct WalletService<'a> {
    storage: &'a Storage,
}

/// A wallet entry with the balance after applying it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletLine {
    #[serde(flatten)]
    pub entry: WalletEntry,
    pub running_balance: f64,
}

/// An owner's ledger for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletStatement {
    pub owner_id: OwnerId,
    pub month: Month,
    /// Closing balance of every earlier month
    pub prior_balance: f64,
    pub lines: Vec<WalletLine>,
    /// prior_balance plus this month's movements
    pub ending_balance: f64,
}

impl WalletStatement {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Net movement within the month
    pub fn net_change(&self) -> f64 {
        self.ending_balance - self.prior_balance
    }

    pub fn total_in(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.entry.signed_amount())
            .filter(|a| *a > 0.0)
            .sum()
    }

    pub fn total_out(&self) -> f64 {
        -self
            .lines
            .iter()
            .map(|l| l.entry.signed_amount())
            .filter(|a| *a < 0.0)
            .sum::<f64>()
    }
}

impl<'a> WalletService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Statement for `owner` in `month`
    pub fn wallet_entries(&self, owner: OwnerId, month: &Month) -> LedgerResult<WalletStatement> {
        let wallets = self.storage.wallets();
        let prior_balance = wallets.signed_total_before(owner, month)?;
        let entries = wallets.find_for_owner_month(owner, month)?;

        let mut balance = prior_balance;
        let lines = entries
            .into_iter()
            .map(|entry| {
                balance += entry.signed_amount();
                WalletLine {
                    entry,
                    running_balance: balance,
                }
            })
            .collect();

        Ok(WalletStatement {
            owner_id: owner,
            month: *month,
            prior_balance,
            lines,
            ending_balance: balance,
        })
    }

    /// Months with activity for an owner, oldest first
    pub fn owner_months(&self, owner: OwnerId) -> LedgerResult<Vec<Month>> {
        self.storage.wallets().months_for_owner(owner)
    }

    /// Statements for every month with activity, oldest first
    pub fn history(&self, owner: OwnerId) -> LedgerResult<Vec<WalletStatement>> {
        self.owner_months(owner)?
            .iter()
            .map(|m| self.wallet_entries(owner, m))
            .collect()
    }
}
