mod schema;

#[cfg(test)]
pub(crate) mod memory;

use anyhow::Context;
use rusqlite::{params, types::ValueRef, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::{LedgerError, Result};
use crate::models::{format_timestamp, parse_timestamp, NewTransaction, Transaction, TransactionKind};

/// Durable keyed collection of transactions.
///
/// The store does no filtering of its own: callers load everything and the
/// ledger engine does the rest.
pub(crate) trait TransactionStore {
    /// Idempotent schema setup, including additive migrations of old tables.
    fn create_table(&mut self) -> Result<()>;

    fn insert(&mut self, txn: &NewTransaction) -> Result<i64>;

    fn list_all(&self) -> Result<Vec<Transaction>>;

    /// Returns `false` when no row had that id.
    fn delete_by_id(&mut self, id: i64) -> Result<bool>;

    /// Delete `stale` income rows and insert `income` in their place.
    ///
    /// The default runs the steps one after another and cannot roll back.
    /// If the store has already been changed when a step fails, the error is
    /// [`LedgerError::PartialFailure`]. Stores with transactions should
    /// override this with an all-or-nothing version.
    fn replace_income(&mut self, stale: &[i64], income: &NewTransaction) -> Result<i64> {
        let month = income.date.format("%Y-%m").to_string();
        let mut completed = 0;

        let interrupted = |completed: usize, err: LedgerError| {
            if completed == 0 {
                return err;
            }
            tracing::warn!(%month, completed, "income replacement interrupted: {err}");
            LedgerError::PartialFailure {
                month: month.clone(),
                completed,
                reason: err.to_string(),
            }
        };

        for &id in stale {
            self.delete_by_id(id).map_err(|e| interrupted(completed, e))?;
            completed += 1;
        }
        self.insert(income).map_err(|e| interrupted(completed, e))
    }
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.create_table().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.create_table()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }
}

impl TransactionStore for Database {
    fn create_table(&mut self) -> Result<()> {
        self.conn.execute_batch(schema::SCHEMA)?;

        for sql in schema::MIGRATIONS {
            match self.conn.execute_batch(sql) {
                Ok(()) => tracing::info!("applied migration: {sql}"),
                Err(e) if e.to_string().contains("duplicate column") => {
                    tracing::debug!("migration already applied: {sql}");
                }
                Err(e) => tracing::warn!("ignoring failed migration `{sql}`: {e}"),
            }
        }
        Ok(())
    }

    fn insert(&mut self, txn: &NewTransaction) -> Result<i64> {
        insert_row(&self.conn, txn)
    }

    fn list_all(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, amount, category, type, date FROM expenses
             ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map([], read_row)?;

        let mut txns = Vec::new();
        for row in rows {
            let (txn, raw_date) = row?;
            match txn {
                Some(txn) => txns.push(txn),
                None => tracing::warn!("skipping transaction with unreadable date {raw_date:?}"),
            }
        }
        Ok(txns)
    }

    fn delete_by_id(&mut self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        tracing::debug!(id, removed, "delete transaction");
        Ok(removed > 0)
    }

    fn replace_income(&mut self, stale: &[i64], income: &NewTransaction) -> Result<i64> {
        let tx = self.conn.transaction()?;
        for id in stale {
            tx.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        }
        let id = insert_row(&tx, income)?;
        tx.commit()?;
        tracing::debug!(id, replaced = stale.len(), "replaced monthly income");
        Ok(id)
    }
}

fn insert_row(conn: &Connection, txn: &NewTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses (title, amount, category, type, date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            txn.title,
            txn.amount.to_string(),
            txn.category,
            txn.kind.as_str(),
            format_timestamp(&txn.date),
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, kind = %txn.kind, "insert transaction");
    Ok(id)
}

/// Decode one row. The transaction is `None` when its date cannot be read;
/// the raw date comes back alongside for logging.
fn read_row(row: &Row<'_>) -> rusqlite::Result<(Option<Transaction>, String)> {
    let raw_date: String = row.get(5)?;
    let Some(date) = parse_timestamp(&raw_date) else {
        return Ok((None, raw_date));
    };
    let kind: Option<String> = row.get(4)?;
    let txn = Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: read_amount(row.get_ref(2)?),
        category: row.get(3)?,
        kind: TransactionKind::parse(kind.as_deref()),
        date,
    };
    Ok((Some(txn), raw_date))
}

/// Older databases stored amounts as REAL. Anything unreadable counts as zero
/// so one bad row cannot poison the month's totals.
fn read_amount(value: ValueRef<'_>) -> Decimal {
    match value {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| Decimal::from_str(s.trim()).ok())
            .unwrap_or_default(),
        ValueRef::Integer(i) => Decimal::from(i),
        ValueRef::Real(f) => Decimal::try_from(f).unwrap_or_default(),
        ValueRef::Null | ValueRef::Blob(_) => Decimal::ZERO,
    }
}
