//! Slot encoding: one flag byte followed by fixed-width field text.

use super::{fit_to_width, Schema};
use crate::error::{CoreError, CoreResult};
use crate::record::{Record, RecordFlag};
use crate::types::RecordId;

impl Schema {
    /// Encodes `record` into exactly [`Schema::slot_length`] bytes.
    ///
    /// Each value is right-padded with spaces (or truncated on a char
    /// boundary) to its field width.
    #[must_use]
    pub fn encode_record(&self, record: &Record) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.slot_length() as usize);
        buf.push(record.flag().as_byte());
        for (i, field) in self.fields.iter().enumerate() {
            let value = record.values().get(i).map(String::as_str).unwrap_or("");
            buf.extend_from_slice(fit_to_width(value, usize::from(field.length)).as_bytes());
        }
        buf
    }

    /// Decodes one slot.
    ///
    /// Field text is returned untrimmed.
    ///
    /// # Errors
    ///
    /// Returns `Corrupted` if `bytes` is not one slot long or the flag byte
    /// is unknown.
    pub fn decode_record(&self, id: RecordId, bytes: &[u8]) -> CoreResult<Record> {
        if bytes.len() as u64 != self.slot_length() {
            return Err(CoreError::corrupted(format!(
                "slot for {id} is {} bytes, expected {}",
                bytes.len(),
                self.slot_length()
            )));
        }
        let flag = RecordFlag::from_byte(bytes[0])?;

        let mut values = Vec::with_capacity(self.fields.len());
        let mut offset = 1;
        for field in &self.fields {
            let end = offset + usize::from(field.length);
            values.push(String::from_utf8_lossy(&bytes[offset..end]).into_owned());
            offset = end;
        }

        Ok(Record::with_flag(id, values, flag))
    }
}
