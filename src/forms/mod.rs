use std::collections::HashSet;

use rust_decimal::{Decimal, RoundingStrategy};

pub mod discounts;
pub mod products;

/// Largest amount the stored precision accepts (ten digits, two of them fractional).
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Round an amount to cents, rejecting negative or oversized values.
pub(crate) fn normalize_amount(value: Decimal) -> Option<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }

    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    if rounded > max_amount() {
        return None;
    }

    Some(rounded)
}

/// Drop repeated identifiers, keeping the first occurrence of each.
pub(crate) fn dedupe_ids(ids: Vec<i32>) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        if line.is_empty() {
            if previous_empty {
                continue;
            }
            previous_empty = true;
            result.push(String::new());
        } else {
            previous_empty = false;
            result.push(line);
        }
    }

    result.join("\n")
}
