//! Engine input state and the operations the presentation layer calls.
//!
//! A [`Session`] owns the store, the last full load of transactions, the
//! selected-month cursor and the active category filters. Every mutation is
//! followed by a full reload, and every derived view is recomputed from the
//! loaded list on demand.

use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::db::TransactionStore;
use crate::error::{LedgerError, Result};
use crate::ledger::{self, policy, CategoryTotal, MonthCursor, MonthSummary, SafeToSpend};
use crate::models::Transaction;

/// Shared flag that stops a disposed session from taking in new state.
///
/// Clones share the flag, so whoever owns the view can cancel work that
/// another thread is running against the session.
#[derive(Debug, Clone, Default)]
pub(crate) struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) struct Session<S: TransactionStore> {
    store: S,
    transactions: Vec<Transaction>,
    cursor: MonthCursor,
    filters: BTreeSet<String>,
    cancel: CancellationToken,
    clock: fn() -> NaiveDateTime,
}

impl<S: TransactionStore> Session<S> {
    /// Start a session viewing the current month. Nothing is loaded yet.
    pub(crate) fn new(store: S) -> Self {
        Self {
            store,
            transactions: Vec::new(),
            cursor: MonthCursor::now(),
            filters: BTreeSet::new(),
            cancel: CancellationToken::new(),
            clock: local_now,
        }
    }

    /// Replace the wall clock used to stamp new expenses and count days left.
    #[cfg(test)]
    pub(crate) fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self.cursor = MonthCursor::new(clock());
        self
    }

    #[cfg(test)]
    pub(crate) fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Mark the session as gone. Later operations fail with [`LedgerError::Cancelled`].
    pub(crate) fn dispose(&self) {
        self.cancel.cancel();
    }

    fn ensure_live(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(LedgerError::Cancelled)
        } else {
            Ok(())
        }
    }

    // ── Store operations ──────────────────────────────────────

    /// Reload every transaction from the store.
    pub(crate) fn load_all(&mut self) -> Result<&[Transaction]> {
        self.ensure_live()?;
        let loaded = self.store.list_all()?;
        // The view may have been disposed while the load was running.
        self.ensure_live()?;
        tracing::debug!(count = loaded.len(), "loaded transactions");
        self.transactions = loaded;
        Ok(&self.transactions)
    }

    /// Record an expense, if the selected month has income to spend against.
    pub(crate) fn add_expense(&mut self, title: &str, amount: &str, category: &str) -> Result<&[Transaction]> {
        self.ensure_live()?;
        let now = (self.clock)();
        policy::add_expense(
            &mut self.store,
            &self.transactions,
            &self.cursor,
            title,
            amount,
            category,
            now,
        )?;
        self.load_all()
    }

    /// Set the selected month's income, replacing any existing income entries.
    ///
    /// The store is reloaded even when the replacement fails part-way, so the
    /// views show what actually happened before the error is returned.
    pub(crate) fn set_monthly_income(&mut self, amount: &str) -> Result<&[Transaction]> {
        self.ensure_live()?;
        let result = policy::upsert_income(&mut self.store, &self.transactions, &self.cursor, amount);
        match result {
            Ok(_) => self.load_all(),
            Err(err @ LedgerError::PartialFailure { .. }) => {
                if let Err(reload) = self.load_all() {
                    tracing::warn!("reload after partial income update failed: {reload}");
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Delete one transaction. Deleting an unknown id is a no-op that returns `false`.
    pub(crate) fn delete_transaction(&mut self, id: i64) -> Result<bool> {
        self.ensure_live()?;
        let removed = self.store.delete_by_id(id)?;
        if !removed {
            tracing::debug!(id, "delete of unknown transaction ignored");
        }
        self.load_all()?;
        Ok(removed)
    }

    // ── Cursor ────────────────────────────────────────────────

    pub(crate) fn cursor(&self) -> &MonthCursor {
        &self.cursor
    }

    pub(crate) fn set_selected_month(&mut self, at: NaiveDateTime) {
        self.cursor.set(at);
    }

    /// Back to the month containing the session clock's now.
    pub(crate) fn select_current_month(&mut self) {
        let now = (self.clock)();
        self.set_selected_month(now);
    }

    pub(crate) fn previous_month(&mut self) {
        self.cursor.previous_month();
    }

    pub(crate) fn next_month(&mut self) {
        self.cursor.next_month();
    }

    pub(crate) fn previous_year(&mut self) {
        self.cursor.previous_year();
    }

    pub(crate) fn next_year(&mut self) {
        self.cursor.next_year();
    }

    pub(crate) fn jump_to_month(&mut self, year: i32, month: u32) -> Result<()> {
        self.cursor.jump_to_month(year, month)
    }

    // ── Category filters ──────────────────────────────────────

    /// Returns whether the category is active after the toggle.
    pub(crate) fn toggle_filter(&mut self, category: &str) -> bool {
        if self.filters.remove(category) {
            false
        } else {
            self.filters.insert(category.to_string());
            true
        }
    }

    /// Activate a category filter. Already-active categories stay active.
    pub(crate) fn add_filter(&mut self, category: &str) {
        self.filters.insert(category.to_string());
    }

    pub(crate) fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub(crate) fn active_filters(&self) -> &BTreeSet<String> {
        &self.filters
    }

    // ── Derived views ─────────────────────────────────────────

    #[cfg(test)]
    pub(crate) fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    fn today(&self) -> NaiveDate {
        (self.clock)().date()
    }

    pub(crate) fn total_income(&self) -> Decimal {
        ledger::total_income(&self.transactions, &self.cursor)
    }

    pub(crate) fn total_expense(&self) -> Decimal {
        ledger::total_expense(&self.transactions, &self.cursor)
    }

    pub(crate) fn budget(&self) -> Decimal {
        ledger::budget(&self.transactions, &self.cursor)
    }

    /// Income already set for the month; pre-fills the income editor.
    pub(crate) fn existing_income(&self) -> Decimal {
        self.total_income()
    }

    pub(crate) fn safe_to_spend(&self) -> SafeToSpend {
        ledger::safe_to_spend(&self.transactions, &self.cursor, self.today())
    }

    pub(crate) fn summary(&self) -> MonthSummary {
        ledger::summarize(&self.transactions, &self.cursor, self.today())
    }

    pub(crate) fn category_breakdown(&self) -> Vec<CategoryTotal> {
        ledger::category_breakdown(&self.transactions, &self.cursor)
    }

    pub(crate) fn recent_transactions(&self) -> Vec<&Transaction> {
        ledger::recent_transactions(&self.transactions, &self.cursor, &self.filters)
    }

    /// The month's transactions, ignoring category filters.
    pub(crate) fn month_transactions(&self) -> Vec<&Transaction> {
        ledger::recent_transactions(&self.transactions, &self.cursor, &BTreeSet::new())
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
