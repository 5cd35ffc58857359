use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::models::{format_timestamp, Transaction};

const HEADER: [&str; 6] = ["id", "date", "kind", "category", "title", "amount"];

/// Write transactions as CSV, in the order given. Returns the number of rows.
pub(crate) fn write_csv<W: Write>(writer: W, txns: &[&Transaction]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for txn in txns {
        wtr.write_record([
            txn.id.to_string(),
            format_timestamp(&txn.date),
            txn.kind.as_str().to_string(),
            txn.category.clone(),
            txn.title.clone(),
            txn.amount.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(txns.len())
}

pub(crate) fn export_to_path(path: &Path, txns: &[&Transaction]) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, txns).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
