//! Month summary and import result formatting

use tabled::{Table, Tabled};

use super::{money, styled};
use crate::models::ExpenseTreatment;
use crate::services::{ImportSummary, MonthSummary};

#[derive(Tabled)]
struct ImportRow {
    #[tabled(rename = "Sheet")]
    sheet: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Months")]
    months: String,
    #[tabled(rename = "Deleted")]
    deleted: usize,
    #[tabled(rename = "Inserted")]
    inserted: usize,
}

/// Format a month's aggregates
pub fn format_month_summary(
    summary: &MonthSummary,
    treatment: ExpenseTreatment,
    currency: &str,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("Month: {}\n", summary.month));
    output.push_str(&format!("  Units:                   {}\n", summary.units));
    output.push_str(&format!(
        "  Expected revenue:        {}\n",
        money(summary.expected_revenue, currency)
    ));
    output.push_str(&format!(
        "  Rent collected:          {}\n",
        money(summary.total_paid, currency)
    ));
    output.push_str(&format!(
        "  Outstanding:             {}\n",
        money(summary.outstanding(), currency)
    ));
    output.push_str(&format!(
        "  Shared expenses:         {}\n",
        money(summary.shared_expenses, currency)
    ));
    output.push_str(&format!(
        "  Owner-specific expenses: {}\n",
        money(summary.owner_specific_expenses, currency)
    ));
    output.push_str(&format!(
        "  Expected distributable:  {} ({})\n",
        money(
            summary.distributable(summary.expected_revenue, treatment),
            currency
        ),
        treatment
    ));
    output.push_str(&format!(
        "  Actual distributable:    {}\n",
        money(summary.distributable(summary.total_paid, treatment), currency)
    ));
    output
}

/// Format the outcome of one or more sheet imports
pub fn format_import_summary(summaries: &[ImportSummary]) -> String {
    if summaries.is_empty() {
        return "Nothing imported.".to_string();
    }

    let rows = summaries.iter().map(|s| ImportRow {
        sheet: s.sheet.name().to_string(),
        source: s.source.clone().unwrap_or_default(),
        months: if s.months.is_empty() {
            "-".to_string()
        } else {
            s.months
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        },
        deleted: s.deleted,
        inserted: s.inserted,
    });
    styled(Table::new(rows), 3)
}
