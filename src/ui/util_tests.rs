#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_keeps_short_titles() {
    assert_eq!(truncate("Groceries", 20), "Groceries");
    assert_eq!(truncate("Rent", 4), "Rent");
}

#[test]
fn test_truncate_long_title() {
    assert_eq!(truncate("Electricity bill for March", 12), "Electricity…");
}

#[test]
fn test_truncate_counts_chars_not_bytes() {
    assert_eq!(truncate("चाय और समोसा", 4), "चाय…");
}

#[test]
fn test_truncate_degenerate_widths() {
    assert_eq!(truncate("Taxi", 0), "");
    assert_eq!(truncate("Taxi", 1), "…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "₹1,234.56");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "₹0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-₹42.50");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89)), "₹1,234,567.89");
}

#[test]
fn test_format_amount_rounds_half_up() {
    assert_eq!(format_amount(dec!(1.005)), "₹1.01");
    assert_eq!(format_amount(dec!(1.5)), "₹1.50");
}

#[test]
fn test_format_amount_tiny_negative_is_not_signed() {
    assert_eq!(format_amount(dec!(-0.001)), "₹0.00");
}

// ── format_percent / progress ─────────────────────────────────

#[test]
fn test_format_percent() {
    assert_eq!(format_percent(dec!(60)), "60%");
    assert_eq!(format_percent(dec!(62.5)), "63%");
    assert_eq!(format_percent(dec!(33.3333)), "33%");
    assert_eq!(format_percent(dec!(0)), "0%");
}

#[test]
fn test_progress_bar_bounds() {
    assert_eq!(progress_bar(0.0, 4), "[----]");
    assert_eq!(progress_bar(1.0, 4), "[####]");
    assert_eq!(progress_bar(0.5, 4), "[##--]");
    assert_eq!(progress_bar(7.0, 4), "[####]");
    assert_eq!(progress_bar(f64::NAN, 4), "[----]");
}

#[test]
fn test_days_left_label() {
    assert_eq!(days_left_label(0), "0 days left");
    assert_eq!(days_left_label(1), "1 day left");
    assert_eq!(days_left_label(16), "16 days left");
}
