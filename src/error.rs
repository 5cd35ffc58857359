//! Errors surfaced by the ledger engine and its policies.

/// The errors that may occur while recording or loading transactions.
///
/// None of these are fatal: the presentation layer turns each one into a
/// message for the user and carries on.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    /// User input was rejected before anything was written.
    ///
    /// Covers malformed or non-positive amounts and missing required fields.
    #[error("{0}")]
    Validation(String),

    /// An expense was submitted for a month with no recorded income.
    ///
    /// Income is the budget, so spending is only admitted against a month
    /// whose budget has been set.
    #[error("no income recorded for {month}; set a monthly income before adding expenses")]
    Admission { month: String },

    /// The transaction store failed to open, read, write or delete.
    ///
    /// The string is only meant for logs; users see a generic message.
    #[error("transaction store error: {0}")]
    Store(String),

    /// A multi-step income update failed after it had already changed the store.
    ///
    /// The month may now have no income at all, so the user needs to review
    /// it and retry.
    #[error("income update for {month} stopped after {completed} change(s): {reason}")]
    PartialFailure {
        month: String,
        completed: usize,
        reason: String,
    },

    /// The session was disposed while the operation was in flight.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl LedgerError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Admission { .. } => "Income required: set a monthly income for this month \
                                       before adding expenses."
                .to_string(),
            Self::Store(_) => "Could not save or load transactions.".to_string(),
            Self::PartialFailure { month, .. } => format!(
                "Income for {month} was only partly updated. Check the month and set the income again."
            ),
            Self::Cancelled => "Operation cancelled.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
