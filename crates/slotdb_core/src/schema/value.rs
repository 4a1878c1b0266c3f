//! Typed views of field text.

use super::field::FieldType;
use super::trim_pad;
use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A monetary amount with a one-character currency symbol.
///
/// Amounts are ordered by value only: `$10` is greater than `£9`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Money {
    /// Currency symbol.
    pub currency: char,
    /// Amount in currency units.
    pub amount: f64,
}

impl Money {
    /// Creates a money value.
    #[must_use]
    pub const fn new(currency: char, amount: f64) -> Self {
        Self { currency, amount }
    }

    /// Parses `text`, falling back to an amount of zero when the amount part
    /// is not a number.
    ///
    /// Text too short to carry a symbol and an amount yields `' '` and zero.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        let text = text.trim();
        let mut chars = text.chars();
        match chars.next() {
            Some(currency) if !chars.as_str().is_empty() => Self {
                currency,
                amount: chars.as_str().trim().parse().unwrap_or(0.0),
            },
            _ => Self::new(' ', 0.0),
        }
    }

    /// Compares amounts, ignoring the currency symbol.
    #[must_use]
    pub fn cmp_amount(&self, other: &Self) -> Ordering {
        self.amount
            .partial_cmp(&other.amount)
            .unwrap_or(Ordering::Equal)
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let mut chars = text.chars();
        let currency = chars
            .next()
            .ok_or_else(|| CoreError::invalid_argument("empty money value"))?;
        let amount = chars.as_str().trim().parse::<f64>().map_err(|_| {
            CoreError::invalid_argument(format!(
                "money value {text:?} must be a currency symbol followed by an amount"
            ))
        })?;
        Ok(Self { currency, amount })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency, self.amount)
    }
}

/// The typed interpretation of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    /// Text with trailing padding removed.
    Text(String),
    /// An integer, or `None` when the field is blank.
    Integer(Option<i64>),
    /// A money value, or `None` when the field is blank.
    Money(Option<Money>),
}

impl Value {
    /// Interprets raw field text as `field_type`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if non-blank text does not parse as the type.
    pub fn parse(field_type: FieldType, raw: &str) -> CoreResult<Self> {
        let text = trim_pad(raw);
        match field_type {
            FieldType::Text => Ok(Self::Text(text.to_string())),
            FieldType::Integer => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(Self::Integer(None));
                }
                text.parse::<i64>().map(|n| Self::Integer(Some(n))).map_err(|_| {
                    CoreError::invalid_argument(format!("{text:?} is not an integer"))
                })
            }
            FieldType::Money => {
                if text.trim().is_empty() {
                    return Ok(Self::Money(None));
                }
                text.parse::<Money>().map(|m| Self::Money(Some(m)))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(Some(n)) => write!(f, "{n}"),
            Self::Money(Some(m)) => write!(f, "{m}"),
            Self::Integer(None) | Self::Money(None) => Ok(()),
        }
    }
}
