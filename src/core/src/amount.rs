//! Conversion between NEAR and yoctoNEAR.

use crate::errors::CoreError;

/// Token balance in yoctoNEAR.
pub type Balance = u128;

/// Number of decimal places in one NEAR.
pub const NEAR_NOMINATION_EXP: usize = 24;

/// One NEAR in yoctoNEAR.
pub const NEAR_NOMINATION: Balance = 1_000_000_000_000_000_000_000_000;

/// Parses a human readable NEAR amount (e.g. `"1.5"`) into yoctoNEAR.
///
/// Commas in the whole part are ignored.
pub fn parse_near_amount(amount: &str) -> Result<Balance, CoreError> {
    let invalid = |reason| CoreError::InvalidAmount {
        amount: amount.to_string(),
        reason,
    };

    let cleaned: String = amount.trim().chars().filter(|c| *c != ',').collect();
    let (whole, fraction) = match cleaned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned.as_str(), ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("empty amount"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a decimal number"));
    }
    if fraction.len() > NEAR_NOMINATION_EXP {
        return Err(invalid("more than 24 fractional digits"));
    }

    let whole: Balance = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("amount is too large"))?
    };
    let padded = format!("{:0<width$}", fraction, width = NEAR_NOMINATION_EXP);
    let fraction: Balance = padded.parse().map_err(|_| invalid("not a decimal number"))?;

    whole
        .checked_mul(NEAR_NOMINATION)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| invalid("amount is too large"))
}

/// Formats a yoctoNEAR balance as NEAR, grouping the whole part with commas
/// and trimming trailing zeros from the fraction.
pub fn format_near_amount(balance: Balance) -> String {
    let whole = (balance / NEAR_NOMINATION).to_string();
    let fraction = balance % NEAR_NOMINATION;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if fraction == 0 {
        return grouped;
    }
    let fraction = format!("{:0>width$}", fraction, width = NEAR_NOMINATION_EXP);
    format!("{}.{}", grouped, fraction.trim_end_matches('0'))
}
