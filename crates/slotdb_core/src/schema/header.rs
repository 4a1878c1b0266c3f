//! File header encoding and validation.

use super::{FieldDescriptor, Schema};
use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use slotdb_storage::{StorageBackend, StorageError};

/// A header as found in a data file, before comparison with any schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    /// Magic constant.
    pub magic: u32,
    /// Declared record length (excluding the flag byte).
    pub record_length: u32,
    /// Field names and widths, in file order.
    pub fields: Vec<(String, u16)>,
    /// Offset of the first record slot.
    pub data_offset: u64,
}

/// Sequential big-endian reader over a positioned backend.
struct HeaderCursor<'a> {
    backend: &'a dyn StorageBackend,
    offset: u64,
}

impl<'a> HeaderCursor<'a> {
    fn new(backend: &'a dyn StorageBackend) -> Self {
        Self { backend, offset: 0 }
    }

    fn bytes(&mut self, len: usize) -> CoreResult<Vec<u8>> {
        match self.backend.read_at(self.offset, len) {
            Ok(bytes) => {
                self.offset += len as u64;
                Ok(bytes)
            }
            Err(e) if e.is_past_end() => Err(CoreError::schema_mismatch(format!(
                "header truncated at byte {}",
                self.offset
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn u16(&mut self) -> CoreResult<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> CoreResult<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

impl FileHeader {
    /// Reads the header at the start of `backend`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if the header is truncated, or a storage error.
    pub fn read(backend: &dyn StorageBackend) -> CoreResult<Self> {
        let mut cursor = HeaderCursor::new(backend);
        let magic = cursor.u32()?;
        let record_length = cursor.u32()?;
        let count = cursor.u16()?;

        let mut fields = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let name_len = cursor.u16()?;
            let name = cursor.bytes(usize::from(name_len))?;
            let width = cursor.u16()?;
            fields.push((String::from_utf8_lossy(&name).into_owned(), width));
        }

        Ok(Self {
            magic,
            record_length,
            fields,
            data_offset: cursor.offset,
        })
    }
}

impl Schema {
    /// Encodes the file header for this schema.
    #[must_use]
    pub fn encode_header(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.header_length() as usize);
        buf.extend_from_slice(&self.magic.to_be_bytes());
        buf.extend_from_slice(&self.record_length().to_be_bytes());
        buf.extend_from_slice(&(self.fields.len() as u16).to_be_bytes());
        for FieldDescriptor { name, length, .. } in &self.fields {
            buf.extend_from_slice(&(name.len() as u16).to_be_bytes());
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(&length.to_be_bytes());
        }
        buf
    }

    /// Size of the encoded header; also the offset of the first slot.
    #[must_use]
    pub fn header_length(&self) -> u64 {
        let table: u64 = self
            .fields
            .iter()
            .map(|f| 2 + f.name.len() as u64 + 2)
            .sum();
        4 + 4 + 2 + table
    }

    /// Validates the header in `backend` against this schema.
    ///
    /// Returns the offset where record data begins.
    ///
    /// # Errors
    ///
    /// - `MagicMismatch` if the magic constant differs or the file is shorter
    ///   than the magic
    /// - `SchemaMismatch` if the geometry or field table differs
    pub fn validate_header(&self, backend: &dyn StorageBackend) -> CoreResult<u64> {
        let actual = match backend.read_at(0, 4) {
            Ok(b) => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
            Err(StorageError::ReadPastEnd { .. }) => 0,
            Err(e) => return Err(e.into()),
        };
        if actual != self.magic {
            return Err(CoreError::MagicMismatch {
                expected: self.magic,
                actual,
            });
        }

        let header = FileHeader::read(backend)?;
        if header.record_length != self.record_length() {
            return Err(CoreError::schema_mismatch(format!(
                "record length {}, expected {}",
                header.record_length,
                self.record_length()
            )));
        }
        if header.fields.len() != self.fields.len() {
            return Err(CoreError::schema_mismatch(format!(
                "{} fields, expected {}",
                header.fields.len(),
                self.fields.len()
            )));
        }
        for (i, ((name, width), expected)) in header.fields.iter().zip(&self.fields).enumerate() {
            if *name != expected.name || *width != expected.length {
                return Err(CoreError::schema_mismatch(format!(
                    "field {i} is {name:?}({width}), expected {:?}({})",
                    expected.name, expected.length
                )));
            }
        }

        Ok(header.data_offset)
    }
}
