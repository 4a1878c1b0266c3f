//! Per-field search filters.

use super::compare::{compare, contains_all, starts_with};
use super::operator::Operator;
use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use crate::schema::Schema;
use crate::types::RecordId;

/// The test applied to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    /// Pattern to test against, or `None` to match anything.
    pub pattern: Option<String>,
    /// How the pattern is applied.
    pub operator: Operator,
}

impl Criterion {
    /// A criterion that matches every value.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            pattern: None,
            operator: Operator::StartsWith,
        }
    }

    /// Creates a criterion with a pattern.
    #[must_use]
    pub fn new(operator: Operator, pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            operator,
        }
    }

    /// Tests one field's stored text.
    #[must_use]
    pub fn matches(&self, schema: &Schema, index: usize, value: &str) -> bool {
        let Some(pattern) = self.pattern.as_deref() else {
            return true;
        };
        match self.operator {
            Operator::StartsWith => starts_with(value, pattern),
            Operator::Contains => contains_all(value, pattern),
            op => schema
                .field(index)
                .is_some_and(|field| op.accepts(compare(field.field_type, value, pattern))),
        }
    }
}

/// One criterion per schema field, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    criteria: Vec<Criterion>,
}

impl Filter {
    /// Creates a filter from per-field criteria.
    #[must_use]
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// A filter over `field_count` fields that matches every record.
    #[must_use]
    pub fn any(field_count: usize) -> Self {
        Self::new(vec![Criterion::any(); field_count])
    }

    /// Applies `StartsWith` to every field; `None` patterns match anything.
    #[must_use]
    pub fn starts_with<S: AsRef<str>>(patterns: &[Option<S>]) -> Self {
        Self::new(
            patterns
                .iter()
                .map(|p| Criterion {
                    pattern: p.as_ref().map(|s| s.as_ref().to_string()),
                    operator: Operator::StartsWith,
                })
                .collect(),
        )
    }

    /// Replaces the criterion for field `index`.
    ///
    /// Out-of-range indexes are ignored; [`Filter::validate`] reports a
    /// filter whose length does not fit the schema.
    #[must_use]
    pub fn with(mut self, index: usize, operator: Operator, pattern: impl Into<String>) -> Self {
        if let Some(slot) = self.criteria.get_mut(index) {
            *slot = Criterion::new(operator, pattern);
        }
        self
    }

    /// Returns the per-field criteria.
    #[must_use]
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Checks that the filter has one criterion per schema field.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` on a length mismatch.
    pub fn validate(&self, schema: &Schema) -> CoreResult<()> {
        if self.criteria.len() == schema.field_count() {
            Ok(())
        } else {
            Err(CoreError::invalid_argument(format!(
                "filter has {} criteria but the schema has {} fields",
                self.criteria.len(),
                schema.field_count()
            )))
        }
    }

    /// Returns whether every field of `record` satisfies its criterion.
    #[must_use]
    pub fn matches(&self, schema: &Schema, record: &Record) -> bool {
        self.criteria
            .iter()
            .zip(record.values())
            .enumerate()
            .all(|(i, (criterion, value))| criterion.matches(schema, i, value))
    }

    /// Returns the ids of the matching records, in input order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the filter does not fit the schema.
    pub fn select<'a>(
        &self,
        schema: &Schema,
        records: impl IntoIterator<Item = &'a Record>,
    ) -> CoreResult<Vec<RecordId>> {
        self.validate(schema)?;
        Ok(records
            .into_iter()
            .filter(|r| self.matches(schema, r))
            .map(Record::id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> (Schema, Vec<Record>) {
        let schema = Schema::contractors();
        let rows = [
            ["Smith", "NYC", "Roofing, Drywall", "5", "$10.00", ""],
            ["Smithson", "LA", "Painting", "3", "$20.00", ""],
            ["Jones", "NYC", "Roofing", "12", "$15.00", "12345678"],
        ];
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| Record::new(RecordId::new(i as u32 + 1), schema.normalize(row).unwrap()))
            .collect();
        (schema, records)
    }

    fn ids(filter: &Filter) -> Vec<u32> {
        let (schema, records) = records();
        filter
            .select(&schema, &records)
            .unwrap()
            .into_iter()
            .map(RecordId::as_u32)
            .collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(ids(&Filter::any(6)), vec![1, 2, 3]);
    }

    #[test]
    fn prefix_equal_and_numeric() {
        assert_eq!(ids(&Filter::any(6).with(0, Operator::StartsWith, "Smith")), vec![1, 2]);
        assert_eq!(ids(&Filter::any(6).with(0, Operator::Equal, "smith")), vec![1]);
        assert_eq!(ids(&Filter::any(6).with(3, Operator::GreaterOrEqual, "5")), vec![1, 3]);
        assert_eq!(ids(&Filter::any(6).with(4, Operator::Less, "€15")), vec![1]);
    }

    #[test]
    fn criteria_are_conjunctive() {
        let filter = Filter::any(6)
            .with(1, Operator::Equal, "NYC")
            .with(2, Operator::Contains, "roofing");
        assert_eq!(ids(&filter), vec![1, 3]);

        let filter = filter.with(2, Operator::Contains, "roofing,drywall");
        assert_eq!(ids(&filter), vec![1]);
    }

    #[test]
    fn blank_owner_is_unbooked() {
        assert_eq!(ids(&Filter::any(6).with(5, Operator::Equal, "")), vec![1, 2]);
        assert_eq!(ids(&Filter::any(6).with(5, Operator::NotEqual, "")), vec![3]);
    }

    #[test]
    fn starts_with_builder() {
        let filter = Filter::starts_with(&[None, Some("ny"), None, None, None, None]);
        assert_eq!(ids(&filter), vec![1, 3]);
    }

    #[test]
    fn length_mismatch_rejected() {
        let (schema, records) = records();
        let result = Filter::any(2).select(&schema, &records);
        assert!(matches!(result, Err(CoreError::InvalidArgument { .. })));
    }
}
