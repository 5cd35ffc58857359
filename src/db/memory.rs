//! In-memory store with fault injection, for exercising failure paths.

use super::TransactionStore;
use crate::error::{LedgerError, Result};
use crate::models::{NewTransaction, Transaction};

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    rows: Vec<Transaction>,
    next_id: i64,
    /// Number of deletes that succeed before every further delete fails.
    pub(crate) deletes_before_failure: Option<usize>,
    pub(crate) fail_inserts: bool,
    pub(crate) fail_loads: bool,
    deletes: usize,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub(crate) fn with_rows(rows: Vec<NewTransaction>) -> Self {
        let mut store = Self::new();
        for row in rows {
            store.push(row);
        }
        store
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    fn push(&mut self, txn: NewTransaction) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(txn.with_id(id));
        id
    }
}

impl TransactionStore for MemoryStore {
    fn create_table(&mut self) -> Result<()> {
        Ok(())
    }

    fn insert(&mut self, txn: &NewTransaction) -> Result<i64> {
        if self.fail_inserts {
            return Err(LedgerError::Store("injected insert failure".into()));
        }
        Ok(self.push(txn.clone()))
    }

    fn list_all(&self) -> Result<Vec<Transaction>> {
        if self.fail_loads {
            return Err(LedgerError::Store("injected load failure".into()));
        }
        Ok(self.rows.clone())
    }

    fn delete_by_id(&mut self, id: i64) -> Result<bool> {
        if self
            .deletes_before_failure
            .is_some_and(|limit| self.deletes >= limit)
        {
            return Err(LedgerError::Store("injected delete failure".into()));
        }
        self.deletes += 1;
        let before = self.rows.len();
        self.rows.retain(|t| t.id != id);
        Ok(self.rows.len() < before)
    }
}
