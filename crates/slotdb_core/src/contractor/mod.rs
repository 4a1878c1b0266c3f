//! Contractor domain layer.
//!
//! A typed view of the contractor schema and a data-access object that
//! works over any [`RecordAccess`](crate::RecordAccess).

mod dao;

pub use dao::ContractorDao;

use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use crate::schema::{Money, Schema, Value};
use crate::types::RecordId;
use serde::Serialize;

/// Index of the name field.
pub const NAME: usize = 0;
/// Index of the location field.
pub const LOCATION: usize = 1;
/// Index of the specialties field.
pub const SPECIALTIES: usize = 2;
/// Index of the company size field.
pub const SIZE: usize = 3;
/// Index of the hourly rate field.
pub const RATE: usize = 4;
/// Index of the owner (booking customer) field.
pub const OWNER: usize = 5;

/// Largest customer number that fits the 8-byte owner field.
pub const MAX_OWNER: u32 = 99_999_999;

/// A subcontractor that customers can book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contractor {
    /// Record id, `None` until stored.
    pub id: Option<RecordId>,
    /// Company name.
    pub name: String,
    /// City the contractor works in.
    pub location: String,
    /// Comma-separated list of trades.
    pub specialties: String,
    /// Number of workers available.
    pub size: u32,
    /// Hourly rate, `None` if not set.
    pub rate: Option<Money>,
    /// Customer number of the booking customer, `None` if available.
    pub owner: Option<u32>,
}

impl Contractor {
    /// Creates an unstored, available contractor.
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: location.into(),
            specialties: String::new(),
            size: 0,
            rate: None,
            owner: None,
        }
    }

    /// Returns whether no customer has booked this contractor.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns the trimmed, non-empty specialties.
    #[must_use]
    pub fn specialty_list(&self) -> Vec<&str> {
        self.specialties
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns field values in contractor schema order.
    #[must_use]
    pub fn to_values(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.location.clone(),
            self.specialties.clone(),
            self.size.to_string(),
            self.rate.map(|r| r.to_string()).unwrap_or_default(),
            self.owner.map(|o| o.to_string()).unwrap_or_default(),
        ]
    }

    /// Builds a contractor from a record of the contractor schema.
    ///
    /// A blank size reads as 0.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a numeric field does not parse or is
    /// out of range.
    pub fn from_record(schema: &Schema, record: &Record) -> CoreResult<Self> {
        let text = |i: usize| record.value(i).unwrap_or_default().to_string();
        let count = |i: usize| -> CoreResult<Option<u32>> {
            match record.typed(schema, i)? {
                Value::Integer(Some(n)) => u32::try_from(n).map(Some).map_err(|_| {
                    CoreError::invalid_argument(format!("field {i} out of range: {n}"))
                }),
                _ => Ok(None),
            }
        };
        let rate = match record.typed(schema, RATE)? {
            Value::Money(money) => money,
            _ => None,
        };

        Ok(Self {
            id: Some(record.id()),
            name: text(NAME),
            location: text(LOCATION),
            specialties: text(SPECIALTIES),
            size: count(SIZE)?.unwrap_or(0),
            rate,
            owner: count(OWNER)?,
        })
    }
}
