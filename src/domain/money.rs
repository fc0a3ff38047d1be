//! Deal amounts.
//!
//! Deal values arrive as decimal strings. They are parsed into
//! `rust_decimal::Decimal` so per-status sums stay exact to the cent, and only
//! turned back into text when a view is rendered.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// Why a deal value could not be used as an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a decimal amount")]
    Malformed(String),
    #[error("amount {0} is negative")]
    Negative(Decimal),
}

/// Parse a non-negative decimal amount such as `"1250.50"`.
pub fn parse_money(raw: &str) -> Result<Decimal, MoneyError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::Empty);
    }

    let amount =
        Decimal::from_str(trimmed).map_err(|_| MoneyError::Malformed(trimmed.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyError::Negative(amount));
    }

    Ok(amount)
}

/// Render an amount for display: `$1,234.50`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{rounded:.2}");
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{fraction}")
}

/// Deserialize a deal value that may be sent as a string or a bare number.
///
/// The raw text is kept as-is; parsing happens during aggregation so a bad
/// value never fails the whole page.
pub fn raw_amount<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}
