//! Core type definitions for slotdb.

use serde::Serialize;
use std::fmt;

/// Identifier of a record slot.
///
/// A record id is the 1-based ordinal position of its slot in the data file.
/// It is immutable once assigned and may be reused after the record is
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RecordId(pub u32);

impl RecordId {
    /// The id of the first slot in a file.
    pub const FIRST: Self = Self(1);

    /// Creates a new record id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the zero-based slot index, or `None` for the invalid id 0.
    #[must_use]
    pub const fn slot_index(self) -> Option<u64> {
        match self.0 {
            0 => None,
            n => Some((n - 1) as u64),
        }
    }

    /// Returns the id that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_ordering() {
        assert!(RecordId::new(1) < RecordId::new(2));
        assert_eq!(RecordId::new(5).next(), RecordId::new(6));
    }

    #[test]
    fn slot_index_is_zero_based() {
        assert_eq!(RecordId::FIRST.slot_index(), Some(0));
        assert_eq!(RecordId::new(4).slot_index(), Some(3));
        assert_eq!(RecordId::new(0).slot_index(), None);
    }

    #[test]
    fn record_id_display() {
        assert_eq!(format!("{}", RecordId::new(42)), "#42");
    }
}
