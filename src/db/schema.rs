pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    title    TEXT NOT NULL,
    amount   TEXT NOT NULL,
    category TEXT NOT NULL,
    type     TEXT DEFAULT 'expense',
    date     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
"#;

/// Additive migrations for databases created by older releases.
///
/// Each statement is attempted on every open. Failures (typically
/// "duplicate column name") mean the migration has already been applied.
pub(crate) const MIGRATIONS: &[&str] = &[
    // Rows from before income tracking have no kind and default to expenses.
    "ALTER TABLE expenses ADD COLUMN type TEXT DEFAULT 'expense'",
];
