//! Plain-text views of a month, shared by the CLI and the interactive shell.

use std::collections::BTreeSet;

use super::util::{days_left_label, format_amount, format_percent, progress_bar, truncate};
use crate::ledger::{CategoryTotal, MonthCursor, MonthSummary};
use crate::models::Transaction;

const RULE_WIDTH: usize = 44;
const BAR_WIDTH: usize = 20;
const TITLE_WIDTH: usize = 22;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

pub(crate) fn summary(cursor: &MonthCursor, summary: &MonthSummary) -> String {
    let safe = &summary.safe_to_spend;
    let mut lines = vec![
        cursor.label(),
        rule(),
        format!("  Income:        {}", format_amount(summary.income)),
        format!("  Expenses:      {}", format_amount(summary.expense)),
        format!("  Safe to spend: {}", format_amount(safe.remaining)),
        format!(
            "  {} {:.0}%  {}",
            progress_bar(safe.progress, BAR_WIDTH),
            safe.progress * 100.0,
            days_left_label(safe.days_left)
        ),
    ];
    if safe.budget.is_zero() {
        lines.push("  No income set for this month".to_string());
    }
    lines.push(format!("  Transactions:  {}", summary.transaction_count));
    lines.join("\n")
}

pub(crate) fn breakdown(totals: &[CategoryTotal]) -> String {
    if totals.is_empty() {
        return "No expenses this month".to_string();
    }
    let mut lines = vec!["Spending by category".to_string(), rule()];
    lines.extend(totals.iter().map(|total| {
        format!(
            "  {:<16} {:>14} {:>5}",
            truncate(&total.category, 16),
            format_amount(total.amount),
            format_percent(total.percent)
        )
    }));
    lines.join("\n")
}

pub(crate) fn transactions(txns: &[&Transaction], filters: &BTreeSet<String>) -> String {
    let mut lines = Vec::new();
    if !filters.is_empty() {
        let names: Vec<&str> = filters.iter().map(String::as_str).collect();
        lines.push(format!("Filtered by: {}", names.join(", ")));
    }
    if txns.is_empty() {
        lines.push("No transactions".to_string());
        return lines.join("\n");
    }

    lines.push(format!(
        "{:>5}  {:<16}  {:<TITLE_WIDTH$}  {:<13}  {:>14}",
        "ID", "Date", "Title", "Category", "Amount"
    ));
    lines.push("─".repeat(5 + 2 + 16 + 2 + TITLE_WIDTH + 2 + 13 + 2 + 14));
    for txn in txns {
        let sign = if txn.is_income() { "+" } else { "-" };
        lines.push(format!(
            "{:>5}  {:<16}  {:<TITLE_WIDTH$}  {:<13}  {:>14}",
            txn.id,
            txn.date.format("%Y-%m-%d %H:%M").to_string(),
            truncate(&txn.title, TITLE_WIDTH),
            truncate(&txn.category, 13),
            format!("{sign}{}", format_amount(txn.amount)),
        ));
    }
    lines.join("\n")
}

pub(crate) fn categories(names: &[&str]) -> String {
    names.join("\n")
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
