//! CSV Export functionality
//!
//! Spreadsheet-friendly dumps of the owner register and a month's wallet
//! entries across all owners.

use crate::error::LedgerResult;
use crate::models::{round2, Month};
use crate::services::OwnerService;
use crate::storage::Storage;
use std::collections::HashMap;
use std::io::Write;

/// Export the owner register with normalized fractions
pub fn export_owners_csv<W: Write>(storage: &Storage, writer: W) -> LedgerResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Owner Id", "Name", "Share Held", "Fraction"])?;

    for share in OwnerService::new(storage).list_with_shares()? {
        csv.write_record([
            share.owner.id.to_string(),
            share.owner.name.clone(),
            share.owner.share_held.to_string(),
            format!("{:.6}", share.fraction),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Export every wallet entry of a month
pub fn export_wallet_entries_csv<W: Write>(
    storage: &Storage,
    month: &Month,
    writer: W,
) -> LedgerResult<()> {
    let names: HashMap<_, _> = storage
        .owners()
        .get_all()?
        .into_iter()
        .map(|o| (o.id, o.name))
        .collect();

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "Id",
        "Month",
        "Owner Id",
        "Owner",
        "Type",
        "Description",
        "Direction",
        "Amount",
        "Created On",
        "Run Id",
    ])?;

    for entry in storage.wallets().find_by_month(month)? {
        let owner = names
            .get(&entry.owner_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        csv.write_record([
            entry.id.to_string(),
            entry.month.to_string(),
            entry.owner_id.to_string(),
            owner,
            entry.entry_type.tag().to_string(),
            entry.description.clone(),
            entry.direction.to_string(),
            format!("{:.2}", round2(entry.amount)),
            entry.created_on.to_rfc3339(),
            entry.run_id.map(|r| r.to_string()).unwrap_or_default(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}
