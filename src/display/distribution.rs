//! Distribution and variance display formatting

use tabled::{Table, Tabled};

use super::{money, status_note, styled};
use crate::services::{DistributionReport, VarianceReport};

#[derive(Tabled)]
struct ExpectedRow {
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Allowance")]
    allowance: String,
    #[tabled(rename = "Net")]
    net: String,
}

#[derive(Tabled)]
struct VarianceTableRow {
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Expected Net")]
    expected_net: String,
    #[tabled(rename = "Actual Gross")]
    actual_gross: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Allowance")]
    allowance: String,
    #[tabled(rename = "Actual Net")]
    actual_net: String,
    #[tabled(rename = "Variance")]
    variance: String,
}

/// Format an expected distribution run
pub fn format_distribution(report: &DistributionReport, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Expected Distribution: {} ({})\n",
        report.month, report.treatment
    ));
    output.push_str(&format!(
        "  Expected revenue: {}\n  Total expenses:   {}\n  Pool expenses:    {}\n  Distributable:    {}\n\n",
        money(report.expected_revenue, currency),
        money(report.total_expenses, currency),
        money(report.pool_expenses, currency),
        money(report.distributable, currency),
    ));

    if let Some(note) = status_note(report.status) {
        output.push_str(note);
        output.push('\n');
        if report.rows.is_empty() {
            return output;
        }
    }

    let rows = report.rows.iter().map(|r| ExpectedRow {
        owner: r.owner_name.clone(),
        share: format!("{:.2}%", r.share_fraction * 100.0),
        gross: money(r.expected_rent, currency),
        expenses: money(r.expected_expenses, currency),
        allowance: money(r.allowance, currency),
        net: money(r.expected_net, currency),
    });
    output.push_str(&styled(Table::new(rows), 1));
    output.push('\n');
    output.push_str(&format!(
        "Total net: {}  |  Wallet entries: {} written, {} replaced\n",
        money(report.total_net(), currency),
        report.wallet_entries,
        report.wallet_entries_replaced
    ));

    output
}

/// Format a variance run
pub fn format_variance(report: &VarianceReport, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Variance Report: {} ({})\n",
        report.month, report.treatment
    ));
    output.push_str(&format!(
        "  Rent collected: {}\n  Total expenses: {}\n  Distributable:  {}\n\n",
        money(report.total_paid, currency),
        money(report.total_expenses, currency),
        money(report.distributable, currency),
    ));

    if let Some(note) = status_note(report.status) {
        output.push_str(note);
        output.push('\n');
        if report.rows.is_empty() {
            return output;
        }
    }

    let rows = report.rows.iter().map(|r| VarianceTableRow {
        owner: r.owner_name.clone(),
        expected_net: money(r.expected_net, currency),
        actual_gross: money(r.actual_gross, currency),
        expenses: money(r.actual_expenses, currency),
        allowance: money(r.allowance, currency),
        actual_net: money(r.actual_net, currency),
        variance: money(r.variance, currency),
    });
    output.push_str(&styled(Table::new(rows), 1));
    output.push('\n');
    output.push_str(&format!(
        "Total variance: {}  |  Wallet entries appended: {}\n",
        money(report.total_variance(), currency),
        report.wallet_entries
    ));

    output
}
