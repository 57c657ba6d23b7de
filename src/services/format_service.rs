//! Display formatting for the dashboard (fixed pt-BR locale, BRL currency)

use rust_decimal::prelude::*;

const CURRENCY_SYMBOL: &str = "R$";
/// Intl-style separator between symbol and amount
const NBSP: char = '\u{a0}';

/// Format a value as Brazilian Real, e.g. `R$ 1.234,56`
pub fn format_currency(n: f64) -> String {
    let sign = if n < 0.0 { "-" } else { "" };

    let amount = if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        "∞".to_string()
    } else {
        let fixed = to_fixed(n.abs(), 2);
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        format!("{},{}", group_thousands(int_part), frac_part)
    };

    format!("{}{}{}{}", sign, CURRENCY_SYMBOL, NBSP, amount)
}

/// Format a percent change with an explicit sign, e.g. `+1.23%` or `-3.85%`
pub fn format_percent(n: f64) -> String {
    let sign = if n >= 0.0 { "+" } else { "" };
    format!("{}{}%", sign, to_fixed(n, 2))
}

/// Format a raw bid with 4 decimals, as used on chart labels and in alerts
pub fn format_bid(n: f64) -> String {
    to_fixed(n, 4)
}

/// Fixed-point rendering with exact ties rounded away from zero.
///
/// The sign is only printed for values below zero, so `-0.0` renders as `0.00`.
pub fn to_fixed(n: f64, decimals: u32) -> String {
    let sign = if n < 0.0 { "-" } else { "" };
    let magnitude = n.abs();

    // NaN, infinities and values outside the Decimal range
    let digits = match Decimal::from_f64_retain(magnitude) {
        Some(value) => format!(
            "{:.precision$}",
            value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero),
            precision = decimals as usize
        ),
        None => format!("{:.precision$}", magnitude, precision = decimals as usize),
    };

    format!("{}{}", sign, digits)
}

/// Insert `.` every three digits from the right
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
