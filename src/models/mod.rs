pub mod category;
mod transaction;

pub use category::{EXPENSE_CATEGORIES, INCOME_CATEGORY};
pub use transaction::{
    format_timestamp, parse_timestamp, NewTransaction, Transaction, TransactionKind, INCOME_TITLE,
};
