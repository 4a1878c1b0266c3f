//! Contractor data-access object.

use super::{Contractor, MAX_OWNER, OWNER};
use crate::access::RecordAccess;
use crate::criteria::Filter;
use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use crate::types::RecordId;
use tracing::info;

/// Loads, stores and books contractors through a [`RecordAccess`].
#[derive(Debug, Clone)]
pub struct ContractorDao<A> {
    access: A,
}

impl<A: RecordAccess> ContractorDao<A> {
    /// Wraps a record access handle.
    pub fn new(access: A) -> Self {
        Self { access }
    }

    /// Returns the underlying access handle.
    pub fn access(&self) -> &A {
        &self.access
    }

    fn convert(&self, record: &Record) -> CoreResult<Contractor> {
        Contractor::from_record(self.access.schema(), record)
    }

    fn require_id(contractor: &Contractor) -> CoreResult<RecordId> {
        contractor
            .id
            .ok_or_else(|| CoreError::invalid_argument("contractor has not been stored"))
    }

    /// Loads one contractor.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the record is absent or deleted.
    pub fn find_by_id(&self, id: RecordId) -> CoreResult<Contractor> {
        self.convert(&self.access.read(id)?)
    }

    /// Loads every contractor in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be converted.
    pub fn load_all(&self) -> CoreResult<Vec<Contractor>> {
        self.access
            .read_all()?
            .iter()
            .map(|r| self.convert(r))
            .collect()
    }

    /// Loads the contractors matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `NoMatch` when nothing matches.
    pub fn load(&self, filter: &Filter) -> CoreResult<Vec<Contractor>> {
        self.access
            .find_records(filter)?
            .iter()
            .map(|r| self.convert(r))
            .collect()
    }

    /// Reloads a stored contractor.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if it was deleted in the meantime.
    pub fn refresh(&self, contractor: &Contractor) -> CoreResult<Contractor> {
        self.find_by_id(Self::require_id(contractor)?)
    }

    /// Stores a new contractor and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if a contractor with the same name and
    /// location exists.
    pub fn store(&self, contractor: &Contractor) -> CoreResult<RecordId> {
        self.access.create(&contractor.to_values())
    }

    /// Writes back a stored contractor.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` or `DuplicateKey`.
    pub fn update(&self, contractor: &Contractor) -> CoreResult<()> {
        let id = Self::require_id(contractor)?;
        self.access.update(id, &contractor.to_values())
    }

    /// Deletes a stored contractor.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if it is already gone.
    pub fn remove(&self, contractor: &Contractor) -> CoreResult<()> {
        self.access.delete(Self::require_id(contractor)?)
    }

    /// Books a contractor for a customer.
    ///
    /// The availability check and the write happen under the record lock,
    /// so of two concurrent bookings exactly one succeeds.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `owner` is not an 8-digit customer number
    /// - `InvalidOperation` if the contractor is already booked
    /// - `RecordNotFound` if the contractor does not exist
    pub fn book(&self, id: RecordId, owner: u32) -> CoreResult<Contractor> {
        if owner == 0 || owner > MAX_OWNER {
            return Err(CoreError::invalid_argument(format!(
                "customer number must be between 1 and {MAX_OWNER}, got {owner}"
            )));
        }

        let record = self.access.modify(id, &mut |values: &mut Vec<String>| {
            let slot = owner_slot(values)?;
            if !slot.trim().is_empty() {
                return Err(CoreError::invalid_operation(format!(
                    "contractor {id} is already booked by customer {}",
                    slot.trim()
                )));
            }
            *slot = owner.to_string();
            Ok(())
        })?;

        info!(%id, owner, "contractor booked");
        self.convert(&record)
    }

    /// Makes a contractor available again.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the contractor does not exist.
    pub fn free(&self, id: RecordId) -> CoreResult<Contractor> {
        let record = self.access.modify(id, &mut |values: &mut Vec<String>| {
            owner_slot(values)?.clear();
            Ok(())
        })?;
        info!(%id, "contractor freed");
        self.convert(&record)
    }
}

fn owner_slot(values: &mut [String]) -> CoreResult<&mut String> {
    values
        .get_mut(OWNER)
        .ok_or_else(|| CoreError::invalid_argument("record has no owner field"))
}
