/// Reserved category for income entries. Never offered as an expense category.
pub const INCOME_CATEGORY: &str = "Income";

/// Categories offered when recording an expense.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Health",
    "Entertainment",
    "Other",
];

/// Find a known expense category by name (case-insensitive).
pub fn find_by_name(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    EXPENSE_CATEGORIES
        .iter()
        .copied()
        .find(|c| c.to_lowercase() == lower)
}

/// Normalize user input to the canonical spelling of a known category.
///
/// Categories are free text, so unknown names are kept as typed (trimmed).
pub fn canonical(name: &str) -> String {
    find_by_name(name)
        .map(str::to_string)
        .unwrap_or_else(|| name.trim().to_string())
}

pub fn is_reserved(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(INCOME_CATEGORY)
}
