//! Criteria engine: comparators, operators and per-field filters.
//!
//! A [`Filter`] holds one [`Criterion`] per schema field. A record matches
//! when every criterion with a pattern accepts the field's text.

mod compare;
mod filter;
mod operator;

pub use compare::{compare, contains_all, starts_with};
pub use filter::{Criterion, Filter};
pub use operator::Operator;
