//! Monthly views derived from the flat transaction log.
//!
//! Everything here is a pure function of the loaded transactions and the
//! selected month. Amounts were sanitized when they were parsed or loaded,
//! so the arithmetic below only has to guard against overflow and division
//! by zero.

mod cursor;
pub(crate) mod policy;

pub(crate) use cursor::{parse_month_key, MonthCursor};

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::Transaction;

/// Transactions whose date falls in the cursor's calendar month.
pub(crate) fn transactions_in_month<'a>(
    txns: &'a [Transaction],
    cursor: &MonthCursor,
) -> impl Iterator<Item = &'a Transaction> {
    let (year, month) = (cursor.year(), cursor.month());
    txns.iter().filter(move |t| t.in_month(year, month))
}

/// An empty filter set lets everything through.
pub(crate) fn matches_categories(txn: &Transaction, filters: &BTreeSet<String>) -> bool {
    filters.is_empty() || filters.contains(&txn.category)
}

fn sum<'a>(txns: impl Iterator<Item = &'a Transaction>) -> Decimal {
    txns.fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

pub(crate) fn total_income(txns: &[Transaction], cursor: &MonthCursor) -> Decimal {
    sum(transactions_in_month(txns, cursor).filter(|t| t.is_income()))
}

/// Legacy rows without a kind load as expenses, so they count here.
pub(crate) fn total_expense(txns: &[Transaction], cursor: &MonthCursor) -> Decimal {
    sum(transactions_in_month(txns, cursor).filter(|t| t.is_expense()))
}

/// Income is the budget. There is no separate budget setting.
pub(crate) fn budget(txns: &[Transaction], cursor: &MonthCursor) -> Decimal {
    let income = total_income(txns, cursor);
    if income > Decimal::ZERO {
        income
    } else {
        Decimal::ZERO
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| {
            let next = first.checked_add_months(Months::new(1))?;
            u32::try_from(next.signed_duration_since(first).num_days()).ok()
        })
        // Only the last representable month overflows, and that is a December.
        .unwrap_or(31)
}

/// Days remaining, measured from today's real date against the length of the
/// cursor's month, floored at zero.
///
/// Only meaningful for the current month. Browsing other months still uses
/// today's day-of-month.
pub(crate) fn days_left(cursor: &MonthCursor, today: NaiveDate) -> u32 {
    days_in_month(cursor.year(), cursor.month()).saturating_sub(today.day())
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SafeToSpend {
    pub(crate) budget: Decimal,
    pub(crate) spent: Decimal,
    /// Not clamped: negative when the month is overspent.
    pub(crate) remaining: Decimal,
    /// Fraction of the budget still available, in `[0, 1]`. Zero without a budget.
    pub(crate) progress: f64,
    pub(crate) days_left: u32,
}

pub(crate) fn safe_to_spend(txns: &[Transaction], cursor: &MonthCursor, today: NaiveDate) -> SafeToSpend {
    let budget = budget(txns, cursor);
    let spent = total_expense(txns, cursor);
    let remaining = budget.saturating_sub(spent);

    let progress = if budget > Decimal::ZERO {
        remaining
            .checked_div(budget)
            .and_then(|p| p.to_f64())
            .filter(|p| p.is_finite())
            .map_or(0.0, |p| p.clamp(0.0, 1.0))
    } else {
        0.0
    };

    SafeToSpend {
        budget,
        spent,
        remaining,
        progress,
        days_left: days_left(cursor, today),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryTotal {
    pub(crate) category: String,
    pub(crate) amount: Decimal,
    /// Share of the month's total expense, 0 to 100.
    pub(crate) percent: Decimal,
}

/// Expense totals per category for the month, largest first.
///
/// Ties are ordered by category name. Income is never part of the breakdown.
pub(crate) fn category_breakdown(txns: &[Transaction], cursor: &MonthCursor) -> Vec<CategoryTotal> {
    let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    for txn in transactions_in_month(txns, cursor).filter(|t| t.is_expense()) {
        let entry = by_category.entry(txn.category.as_str()).or_default();
        *entry = entry.saturating_add(txn.amount);
    }

    let total = by_category
        .values()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v));

    let mut breakdown: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
            percent: percent_of(amount, total),
        })
        .collect();

    // Stable sort keeps the BTreeMap's name order among equal totals.
    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount));
    breakdown
}

fn percent_of(part: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(total))
        .unwrap_or(Decimal::ZERO)
}

/// Month's transactions passing the category filter, newest first.
///
/// Transactions with the same timestamp are ordered by id, newest id first.
pub(crate) fn recent_transactions<'a>(
    txns: &'a [Transaction],
    cursor: &MonthCursor,
    filters: &BTreeSet<String>,
) -> Vec<&'a Transaction> {
    let mut recent: Vec<&Transaction> = transactions_in_month(txns, cursor)
        .filter(|t| matches_categories(t, filters))
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    recent
}

/// Totals shown at the top of the month view.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthSummary {
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) safe_to_spend: SafeToSpend,
    pub(crate) transaction_count: usize,
}

pub(crate) fn summarize(txns: &[Transaction], cursor: &MonthCursor, today: NaiveDate) -> MonthSummary {
    MonthSummary {
        income: total_income(txns, cursor),
        expense: total_expense(txns, cursor),
        safe_to_spend: safe_to_spend(txns, cursor, today),
        transaction_count: transactions_in_month(txns, cursor).count(),
    }
}
