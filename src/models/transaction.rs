use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::category::INCOME_CATEGORY;

/// Title given to every income entry.
pub const INCOME_TITLE: &str = "Monthly Income";

/// Format used when writing timestamps to the store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Rows written before the kind column existed have no kind; they are expenses.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("income") => Self::Income,
            _ => Self::Expense,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub kind: TransactionKind,
    pub date: NaiveDateTime,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Calendar month comparison only; day and time are ignored.
    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }
}

/// A transaction that has not been stored yet, so it has no id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub kind: TransactionKind,
    pub date: NaiveDateTime,
}

impl NewTransaction {
    pub fn income(amount: Decimal, date: NaiveDateTime) -> Self {
        Self {
            title: INCOME_TITLE.to_string(),
            amount,
            category: INCOME_CATEGORY.to_string(),
            kind: TransactionKind::Income,
            date,
        }
    }

    pub fn expense(title: String, amount: Decimal, category: String, date: NaiveDateTime) -> Self {
        Self {
            title,
            amount,
            category,
            kind: TransactionKind::Expense,
            date,
        }
    }

    #[cfg(test)]
    pub fn with_id(self, id: i64) -> Transaction {
        Transaction {
            id,
            title: self.title,
            amount: self.amount,
            category: self.category,
            kind: self.kind,
            date: self.date,
        }
    }
}

pub fn format_timestamp(date: &NaiveDateTime) -> String {
    date.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp.
///
/// Accepts the native format, RFC 3339 with an offset (converted to local
/// time), fractional seconds, and a bare `YYYY-MM-DD` (midnight).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
