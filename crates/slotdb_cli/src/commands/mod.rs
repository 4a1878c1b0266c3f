//! CLI command implementations.

pub mod booking;
pub mod dump;
pub mod find;
pub mod init;
pub mod inspect;

use slotdb_core::{Filter, Operator, Schema};
use thiserror::Error;

/// Errors raised by the CLI itself rather than the store.
#[derive(Debug, Error)]
pub enum CliError {
    /// A command that works on a file was run without `--path`.
    #[error("data file path required for {0}")]
    PathRequired(&'static str),

    /// A criterion that is not `field:OP:pattern`.
    #[error("invalid criterion {0:?}: expected field:OP:pattern")]
    BadCriterion(String),

    /// A criterion naming a field the schema does not have.
    #[error("unknown field {0:?}")]
    UnknownField(String),
}

/// Builds a filter from `field:OP:pattern` arguments.
///
/// `field` is a field name or a zero-based index. The pattern may contain
/// further colons. Fields without a criterion match anything.
pub fn parse_filter(
    schema: &Schema,
    criteria: &[String],
) -> Result<Filter, Box<dyn std::error::Error>> {
    let mut filter = Filter::any(schema.field_count());
    for arg in criteria {
        let mut parts = arg.splitn(3, ':');
        let (Some(field), Some(op), Some(pattern)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CliError::BadCriterion(arg.clone()).into());
        };
        let index = schema
            .field_index(field)
            .or_else(|| field.parse::<usize>().ok().filter(|&i| i < schema.field_count()))
            .ok_or_else(|| CliError::UnknownField(field.to_string()))?;
        let operator: Operator = op.parse()?;
        filter = filter.with(index, operator, pattern);
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotdb_core::Criterion;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_named_and_indexed_fields() {
        let schema = Schema::contractors();
        let filter = parse_filter(&schema, &args(&["name:ST:Mo", "3:>=:5", "rate:<:$9:99"])).unwrap();

        let criteria = filter.criteria();
        assert_eq!(criteria[0], Criterion::new(Operator::StartsWith, "Mo"));
        assert_eq!(criteria[3], Criterion::new(Operator::GreaterOrEqual, "5"));
        assert_eq!(criteria[4], Criterion::new(Operator::Less, "$9:99"));
        assert_eq!(criteria[1], Criterion::any());
    }

    #[test]
    fn rejects_malformed_criteria() {
        let schema = Schema::contractors();
        assert!(parse_filter(&schema, &args(&["name=Mo"])).is_err());
        assert!(parse_filter(&schema, &args(&["colour:=:red"])).is_err());
        assert!(parse_filter(&schema, &args(&["9:=:x"])).is_err());
        assert!(parse_filter(&schema, &args(&["name:~:x"])).is_err());
    }
}
