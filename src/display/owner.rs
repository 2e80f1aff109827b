//! Owner display formatting

use tabled::{Table, Tabled};

use crate::services::OwnerShare;

#[derive(Tabled)]
struct OwnerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Share Held")]
    share_held: String,
    #[tabled(rename = "Fraction")]
    fraction: String,
}

/// Format the owner register as a table
pub fn format_owner_list(owners: &[OwnerShare]) -> String {
    if owners.is_empty() {
        return "No owners found.".to_string();
    }

    let rows = owners.iter().map(|s| OwnerRow {
        id: s.owner.id.to_string(),
        name: s.owner.name.clone(),
        share_held: s.owner.share_held.to_string(),
        fraction: format!("{:.2}%", s.fraction * 100.0),
    });

    let total: f64 = owners.iter().map(|s| s.owner.share_held).sum();
    let mut output = super::styled(Table::new(rows), 2);
    output.push_str(&format!("\nTotal shares: {}  |  Owners: {}\n", total, owners.len()));
    output
}

/// Format a single owner's details
pub fn format_owner_details(share: &OwnerShare) -> String {
    let mut output = String::new();
    output.push_str(&format!("Owner: {}\n", share.owner.name));
    output.push_str(&format!("  ID:         {}\n", share.owner.id));
    output.push_str(&format!("  Share Held: {}\n", share.owner.share_held));
    output.push_str(&format!("  Fraction:   {:.2}%\n", share.fraction * 100.0));
    output
}
