//! Search operators.

use crate::error::CoreError;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How a field value is tested against a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    /// Values compare equal.
    Equal,
    /// Values compare unequal.
    NotEqual,
    /// Field value is greater than the pattern.
    Greater,
    /// Field value is greater than or equal to the pattern.
    GreaterOrEqual,
    /// Field value is less than the pattern.
    Less,
    /// Field value is less than or equal to the pattern.
    LessOrEqual,
    /// Case-insensitive prefix match on the field text.
    StartsWith,
    /// Every comma-separated pattern token is one of the field's tokens.
    Contains,
}

impl Operator {
    /// All operators, in display order.
    pub const ALL: [Self; 8] = [
        Self::Equal,
        Self::NotEqual,
        Self::Greater,
        Self::GreaterOrEqual,
        Self::Less,
        Self::LessOrEqual,
        Self::StartsWith,
        Self::Contains,
    ];

    /// Returns the short symbol, e.g. `>=` or `ST`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::StartsWith => "ST",
            Self::Contains => "%%",
        }
    }

    /// Returns the human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equal => "Equal",
            Self::NotEqual => "Not equal",
            Self::Greater => "Greater",
            Self::GreaterOrEqual => "Greater or equal",
            Self::Less => "Less",
            Self::LessOrEqual => "Less or equal",
            Self::StartsWith => "Starts with",
            Self::Contains => "Contains",
        }
    }

    /// Returns whether this operator is decided by a comparator result.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        !matches!(self, Self::StartsWith | Self::Contains)
    }

    /// Applies an ordering operator to `compare(field, pattern)`.
    ///
    /// Returns `false` for `StartsWith` and `Contains`.
    #[must_use]
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => ordering.is_eq(),
            Self::NotEqual => ordering.is_ne(),
            Self::Greater => ordering.is_gt(),
            Self::GreaterOrEqual => ordering.is_ge(),
            Self::Less => ordering.is_lt(),
            Self::LessOrEqual => ordering.is_le(),
            Self::StartsWith | Self::Contains => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CoreError;

    /// Accepts a symbol (case-insensitive for `ST`) or a name, spaces and
    /// case ignored, e.g. `>=`, `st`, `greaterorequal`, `Starts with`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let squashed: String = wanted
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();
        Self::ALL
            .into_iter()
            .find(|op| {
                op.symbol().eq_ignore_ascii_case(wanted)
                    || op.name().replace(' ', "").eq_ignore_ascii_case(&squashed)
            })
            .ok_or_else(|| CoreError::invalid_argument(format!("unknown operator {wanted:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>().unwrap(), op);
            assert_eq!(op.to_string(), op.symbol());
        }
    }

    #[test]
    fn names_parse_loosely() {
        assert_eq!("greater_or_equal".parse::<Operator>().unwrap(), Operator::GreaterOrEqual);
        assert_eq!("Starts with".parse::<Operator>().unwrap(), Operator::StartsWith);
        assert_eq!("st".parse::<Operator>().unwrap(), Operator::StartsWith);
        assert_eq!("contains".parse::<Operator>().unwrap(), Operator::Contains);
        assert!("~".parse::<Operator>().is_err());
    }

    #[test]
    fn ordering_operators() {
        use Ordering::{Equal, Greater, Less};
        assert!(Operator::Equal.accepts(Equal));
        assert!(Operator::NotEqual.accepts(Less));
        assert!(Operator::Greater.accepts(Greater));
        assert!(!Operator::Greater.accepts(Equal));
        assert!(Operator::GreaterOrEqual.accepts(Equal));
        assert!(Operator::Less.accepts(Less));
        assert!(Operator::LessOrEqual.accepts(Equal));
        assert!(!Operator::LessOrEqual.accepts(Greater));
        assert!(!Operator::StartsWith.accepts(Equal));
        assert!(!Operator::Contains.is_ordering());
    }
}
