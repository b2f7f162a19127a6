//! Amount and weight parsing.
//!
//! All arithmetic happens in `rust_decimal::Decimal` and ends in whole cents
//! (`i64`). Binary floats only appear at the JSON boundary and are converted
//! immediately.

use core::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A user-supplied numeric value: either a JSON number or a string such as
/// `"$12.50"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Decimal value of the input, or `None` when it is not a finite number.
    ///
    /// Strings keep only digits, `.`, `,` and `-`; commas are treated as
    /// thousands separators and dropped.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            NumericInput::Number(value) => {
                if !value.is_finite() {
                    return None;
                }
                Decimal::from_f64(*value)
            }
            NumericInput::Text(raw) => {
                let normalized: String = raw
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                if normalized.is_empty() {
                    return None;
                }
                Decimal::from_str(&normalized).ok()
            }
        }
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

/// Integers go through the text form so values above 2^53 stay exact.
impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Text(value.to_string())
    }
}

/// Round to the nearest whole unit, halves away from zero.
pub(crate) fn round_to_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a major-unit amount (e.g. dollars) into cents.
///
/// Returns `None` for anything that is not a finite number. The sign is kept;
/// rejecting non-positive amounts is the caller's decision.
pub fn parse_amount_to_cents(input: &NumericInput) -> Option<i64> {
    let amount = input.to_decimal()?;
    let cents = amount.checked_mul(Decimal::ONE_HUNDRED)?;
    round_to_whole(cents).to_i64()
}

/// Parse a share weight. Only finite, strictly positive weights are accepted.
pub fn parse_weight(input: &NumericInput) -> Option<Decimal> {
    input.to_decimal().filter(|w| *w > Decimal::ZERO)
}
