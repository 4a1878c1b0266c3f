//! Records and their slot flag.

use crate::error::{CoreError, CoreResult};
use crate::schema::{trim_pad, Schema, Value};
use crate::types::RecordId;
use serde::Serialize;

/// The flag byte that leads every slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordFlag {
    /// A live record.
    Valid,
    /// A deleted record whose slot may be reused.
    Tombstoned,
}

impl RecordFlag {
    /// Decodes a flag byte.
    ///
    /// # Errors
    ///
    /// Returns `Corrupted` for any byte other than 0 or 1.
    pub fn from_byte(b: u8) -> CoreResult<Self> {
        match b {
            0 => Ok(Self::Valid),
            1 => Ok(Self::Tombstoned),
            other => Err(CoreError::corrupted(format!("unknown flag byte {other:#04x}"))),
        }
    }

    /// Returns the on-disk byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Valid => 0,
            Self::Tombstoned => 1,
        }
    }
}

/// One record slot: its id, field text and deletion flag.
///
/// Field text is kept exactly as stored, padding included. Use
/// [`Record::value`] or [`Record::typed`] for trimmed views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    id: RecordId,
    values: Vec<String>,
    tombstoned: bool,
}

impl Record {
    /// Creates a live record.
    #[must_use]
    pub fn new(id: RecordId, values: Vec<String>) -> Self {
        Self {
            id,
            values,
            tombstoned: false,
        }
    }

    pub(crate) fn with_flag(id: RecordId, values: Vec<String>, flag: RecordFlag) -> Self {
        Self {
            id,
            values,
            tombstoned: flag == RecordFlag::Tombstoned,
        }
    }

    /// Returns the record id.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the raw field text, padding included.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns field `index` with trailing padding removed.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(|v| trim_pad(v))
    }

    /// Returns every field with trailing padding removed.
    #[must_use]
    pub fn trimmed_values(&self) -> Vec<String> {
        self.values.iter().map(|v| trim_pad(v).to_string()).collect()
    }

    /// Interprets field `index` according to `schema`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the index is out of range or the stored
    /// text does not parse as the field's type.
    pub fn typed(&self, schema: &Schema, index: usize) -> CoreResult<Value> {
        let field = schema
            .field(index)
            .ok_or_else(|| CoreError::invalid_argument(format!("no field at index {index}")))?;
        let raw = self
            .values
            .get(index)
            .ok_or_else(|| CoreError::invalid_argument(format!("no value at index {index}")))?;
        Value::parse(field.field_type, raw)
    }

    /// Returns whether the record is deleted.
    #[must_use]
    pub fn is_tombstoned(&self) -> bool {
        self.tombstoned
    }

    /// Returns the slot flag for this record.
    #[must_use]
    pub fn flag(&self) -> RecordFlag {
        if self.tombstoned {
            RecordFlag::Tombstoned
        } else {
            RecordFlag::Valid
        }
    }

    /// Returns the same slot marked as deleted, field text unchanged.
    #[must_use]
    pub fn into_tombstone(mut self) -> Self {
        self.tombstoned = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Money;

    #[test]
    fn flag_bytes() {
        assert_eq!(RecordFlag::from_byte(0).unwrap(), RecordFlag::Valid);
        assert_eq!(RecordFlag::from_byte(1).unwrap(), RecordFlag::Tombstoned);
        assert!(matches!(
            RecordFlag::from_byte(7),
            Err(CoreError::Corrupted { .. })
        ));
        assert_eq!(RecordFlag::Tombstoned.as_byte(), 1);
    }

    #[test]
    fn values_are_trimmed_on_access() {
        let record = Record::new(
            RecordId::new(1),
            vec!["Fred  ".into(), "Here\0\0".into()],
        );
        assert_eq!(record.value(0), Some("Fred"));
        assert_eq!(record.value(1), Some("Here"));
        assert_eq!(record.values()[0], "Fred  ");
        assert_eq!(record.value(2), None);
    }

    #[test]
    fn typed_access() {
        let schema = Schema::contractors();
        let values = schema
            .normalize(&["Acme", "Paris", "Glass", "12", "€15.50", ""])
            .unwrap();
        let record = Record::new(RecordId::new(3), values);

        assert_eq!(
            record.typed(&schema, 3).unwrap(),
            Value::Integer(Some(12))
        );
        assert_eq!(
            record.typed(&schema, 4).unwrap(),
            Value::Money(Some(Money::new('€', 15.5)))
        );
        assert_eq!(record.typed(&schema, 5).unwrap(), Value::Integer(None));
        assert!(record.typed(&schema, 9).is_err());
    }

    #[test]
    fn tombstone_keeps_values() {
        let record = Record::new(RecordId::new(2), vec!["x".into()]).into_tombstone();
        assert!(record.is_tombstoned());
        assert_eq!(record.flag(), RecordFlag::Tombstoned);
        assert_eq!(record.value(0), Some("x"));
    }
}
