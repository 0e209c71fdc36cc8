//! Formatting helpers shared by the report views

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Amount;

/// Format an amount in the locale convention followed by the currency symbol
pub fn format_money(amount: Amount, currency: &str) -> String {
    if currency.is_empty() {
        amount.format_locale()
    } else {
        format!("{} {}", amount.format_locale(), currency)
    }
}

/// Format a percentage with two decimals and a decimal comma ("20,67%")
pub fn format_percentage(pct: Decimal) -> String {
    let rounded = pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}%", rounded).replace('.', ",")
}

/// Format a header line with padding
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = if len >= width { 0 } else { (width - len) / 2 };
    format!("{}{}", " ".repeat(padding), title)
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}
