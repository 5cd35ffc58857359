//! Rules that guard what may be written to the store.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{total_income, transactions_in_month, MonthCursor};
use crate::db::TransactionStore;
use crate::error::{LedgerError, Result};
use crate::models::{category, NewTransaction, Transaction};

/// Parse user-entered text into a positive amount.
///
/// This is the only place free-form numbers enter the ledger.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation("Please enter an amount".into()));
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| LedgerError::Validation(format!("Invalid amount: {trimmed}")))?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Amount must be greater than zero, got {trimmed}"
        )));
    }
    Ok(amount)
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation(format!("Please fill in the {field}")));
    }
    Ok(trimmed.to_string())
}

/// Ids of every income entry in the cursor's month.
pub(crate) fn month_income_ids(txns: &[Transaction], cursor: &MonthCursor) -> Vec<i64> {
    transactions_in_month(txns, cursor)
        .filter(|t| t.is_income())
        .map(|t| t.id)
        .collect()
}

/// Replace the month's income with a single entry of `raw_amount`.
///
/// All existing income rows for the month are removed, however many there
/// are, so repeated or duplicated entries collapse to one. The new entry is
/// dated at the cursor, not the wall clock, to keep it in the viewed month.
pub(crate) fn upsert_income<S: TransactionStore + ?Sized>(
    store: &mut S,
    txns: &[Transaction],
    cursor: &MonthCursor,
    raw_amount: &str,
) -> Result<i64> {
    let amount = parse_amount(raw_amount)?;
    let stale = month_income_ids(txns, cursor);
    let income = NewTransaction::income(amount, cursor.timestamp());

    tracing::debug!(month = %cursor.key(), replacing = stale.len(), %amount, "set monthly income");
    store.replace_income(&stale, &income)
}

/// Expenses are only admitted against a month that has income recorded.
///
/// Checked against the loaded transactions, not re-queried from the store.
pub(crate) fn check_admission(txns: &[Transaction], cursor: &MonthCursor) -> Result<()> {
    if total_income(txns, cursor) > Decimal::ZERO {
        Ok(())
    } else {
        Err(LedgerError::Admission {
            month: cursor.key(),
        })
    }
}

/// Validate and store a new expense stamped with `now`.
pub(crate) fn add_expense<S: TransactionStore + ?Sized>(
    store: &mut S,
    txns: &[Transaction],
    cursor: &MonthCursor,
    title: &str,
    raw_amount: &str,
    category_name: &str,
    now: NaiveDateTime,
) -> Result<i64> {
    let title = required("title", title)?;
    let category_name = required("category", category_name)?;
    if category::is_reserved(&category_name) {
        return Err(LedgerError::Validation(format!(
            "\"{category_name}\" is reserved for income"
        )));
    }
    let amount = parse_amount(raw_amount)?;
    check_admission(txns, cursor)?;

    let expense = NewTransaction::expense(title, amount, category::canonical(&category_name), now);
    store.insert(&expense)
}
