//! Display formatting for weights, quantities, and package deadlines.
//!
//! Numbers follow Brazilian conventions: `.` groups thousands and `,`
//! separates decimals (`1.234,500`).

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use chrono::{DateTime, Utc};

pub const WEIGHT_DECIMALS: usize = 3;

/// Format `value` with exactly `decimals` fraction digits. Missing or
/// non-finite values render as zero.
pub fn format_decimal(value: Option<f64>, decimals: usize) -> String {
    let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // No sign on values that round to zero.
    if value.is_sign_negative() && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

pub fn format_weight(value: Option<f64>) -> String {
    format_decimal(value, WEIGHT_DECIMALS)
}

/// Coarse time left on a package: `"2d 3h"`, `"5h"`, or `"Expired"`.
pub fn format_time_remaining(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> String {
    let diff_ms = (expires_at - now).num_milliseconds();
    if diff_ms <= 0 {
        return "Expired".to_owned();
    }
    let days = diff_ms / 86_400_000;
    let hours = (diff_ms % 86_400_000) / 3_600_000;
    if days > 0 { format!("{days}d {hours}h") } else { format!("{hours}h") }
}

/// Weight in kilograms for a package of `quantity` items measured in `unit`.
///
/// `kg` quantities are already weights; `unit` quantities use the item's
/// per-unit weight. Any other unit has no known weight.
pub fn total_kg(quantity: f64, unit: &str, unit_to_kg: Option<f64>) -> f64 {
    match unit {
        "kg" => quantity,
        "unit" => quantity * unit_to_kg.unwrap_or(0.0),
        _ => 0.0,
    }
}
