//! Display formatting for terminal output
//!
//! Renders owners, distribution and variance runs, and month summaries as
//! `tabled` tables. Amounts are rounded to cents and shown with the
//! configured currency symbol.

pub mod distribution;
pub mod owner;
pub mod summary;

pub use distribution::{format_distribution, format_variance};
pub use owner::{format_owner_details, format_owner_list};
pub use summary::{format_import_summary, format_month_summary};

use crate::models::{AllocationStatus, Money};
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::Table;

/// Format an amount with the currency symbol
pub(crate) fn money(value: f64, currency: &str) -> String {
    Money::new(value).format_with_symbol(currency)
}

/// Apply the shared table style, right-aligning columns from `first_numeric`
pub(crate) fn styled(mut table: Table, first_numeric: usize) -> String {
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(first_numeric..)).with(Alignment::right()));
    table.to_string()
}

/// Explanation shown when an allocation had nothing to apportion
pub(crate) fn status_note(status: AllocationStatus) -> Option<&'static str> {
    match status {
        AllocationStatus::Computed => None,
        AllocationStatus::NoOwners => Some("No owners registered; nothing was distributed."),
        AllocationStatus::ZeroShares => {
            Some("Every owner holds a zero share; all gross distributions are zero.")
        }
    }
}
