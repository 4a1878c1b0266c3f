//! Record schema and the fixed binary layout.
//!
//! A data file starts with a header describing the record geometry,
//! followed by fixed-size slots:
//!
//! ```text
//! [4 bytes]  magic constant                     (big-endian)
//! [4 bytes]  record length, excluding the flag  (big-endian)
//! [2 bytes]  field count N                      (big-endian)
//! N times:
//!   [2 bytes]  field-name byte length L
//!   [L bytes]  field name
//!   [2 bytes]  field byte length
//! slots until EOF:
//!   [1 byte]   flag (0 = valid, 1 = tombstoned)
//!   [record length bytes] space-padded field text
//! ```

mod codec;
mod field;
mod header;
mod value;

pub use field::{FieldDescriptor, FieldType};
pub use header::FileHeader;
pub use value::{Money, Value};

use crate::error::{CoreError, CoreResult};
use serde::Serialize;

/// Size of the per-slot flag byte.
pub const FLAG_LENGTH: u64 = 1;

/// Magic constant of contractor data files.
pub const CONTRACTOR_MAGIC: u32 = 513;

/// Removes trailing pad characters (spaces and NULs).
pub(crate) fn trim_pad(text: &str) -> &str {
    text.trim_end_matches([' ', '\0'])
}

/// Truncates `text` to at most `width` bytes on a char boundary, then pads
/// with spaces to exactly `width` bytes.
pub(crate) fn fit_to_width(text: &str, width: usize) -> String {
    let mut end = text.len().min(width);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(width);
    out.push_str(&text[..end]);
    out.extend(std::iter::repeat(' ').take(width - end));
    out
}

/// The ordered field layout of a data file.
///
/// A schema is fixed when a file is created. Opening a file whose header
/// differs in any way fails with `SchemaMismatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    magic: u32,
    fields: Vec<FieldDescriptor>,
    key: Vec<usize>,
}

impl Schema {
    /// Creates a schema with no key fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if there are no fields, a field has zero
    /// width, or two fields share a name (case-insensitively).
    pub fn new(magic: u32, fields: Vec<FieldDescriptor>) -> CoreResult<Self> {
        if fields.is_empty() {
            return Err(CoreError::invalid_argument("schema needs at least one field"));
        }
        if fields.len() > usize::from(u16::MAX) {
            return Err(CoreError::invalid_argument("too many fields"));
        }
        for (i, field) in fields.iter().enumerate() {
            if field.length == 0 {
                return Err(CoreError::invalid_argument(format!(
                    "field {:?} has zero width",
                    field.name
                )));
            }
            if field.name.len() > usize::from(u16::MAX) {
                return Err(CoreError::invalid_argument("field name too long"));
            }
            if fields[..i]
                .iter()
                .any(|f| f.name.eq_ignore_ascii_case(&field.name))
            {
                return Err(CoreError::invalid_argument(format!(
                    "duplicate field name {:?}",
                    field.name
                )));
            }
        }
        Ok(Self {
            magic,
            fields,
            key: Vec::new(),
        })
    }

    /// Sets the fields whose combined value must be unique among live records.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a name is not a field of this schema.
    pub fn with_key(mut self, names: &[&str]) -> CoreResult<Self> {
        self.key = names
            .iter()
            .map(|name| {
                self.field_index(name).ok_or_else(|| {
                    CoreError::invalid_argument(format!("unknown key field {name:?}"))
                })
            })
            .collect::<CoreResult<_>>()?;
        Ok(self)
    }

    /// The contractor schema: name and location form the key.
    #[must_use]
    pub fn contractors() -> Self {
        Self {
            magic: CONTRACTOR_MAGIC,
            fields: vec![
                FieldDescriptor::text("name", 32),
                FieldDescriptor::text("location", 64),
                FieldDescriptor::text("specialties", 64),
                FieldDescriptor::integer("size", 6),
                FieldDescriptor::money("rate", 8),
                FieldDescriptor::integer("owner", 8),
            ],
            key: vec![0, 1],
        }
    }

    /// Returns the magic constant.
    #[must_use]
    pub fn magic(&self) -> u32 {
        self.magic
    }

    /// Returns the field descriptors in file order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the descriptor at `index`.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns the positions of the key fields.
    #[must_use]
    pub fn key_fields(&self) -> &[usize] {
        &self.key
    }

    /// Finds a field by name, ignoring ASCII case.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Sum of all field widths, excluding the flag byte.
    #[must_use]
    pub fn record_length(&self) -> u32 {
        self.fields.iter().map(|f| u32::from(f.length)).sum()
    }

    /// Size of one slot on disk, including the flag byte.
    #[must_use]
    pub fn slot_length(&self) -> u64 {
        u64::from(self.record_length()) + FLAG_LENGTH
    }

    /// Validates `values` against the schema and fits each to its width.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the count differs from the field count,
    /// or a non-blank Integer/Money value does not parse or is wider than
    /// its field. Text is truncated instead.
    pub fn normalize<S: AsRef<str>>(&self, values: &[S]) -> CoreResult<Vec<String>> {
        if values.len() != self.fields.len() {
            return Err(CoreError::invalid_argument(format!(
                "expected {} field values, got {}",
                self.fields.len(),
                values.len()
            )));
        }
        self.fields
            .iter()
            .zip(values)
            .map(|(field, value)| {
                let value = value.as_ref();
                Value::parse(field.field_type, value).map_err(|e| {
                    CoreError::invalid_argument(format!("field {:?}: {e}", field.name))
                })?;
                let width = usize::from(field.length);
                let used = value.trim_end().len();
                if field.field_type != FieldType::Text && used > width {
                    return Err(CoreError::invalid_argument(format!(
                        "field {:?}: {value:?} is {used} bytes, width is {width}",
                        field.name
                    )));
                }
                Ok(fit_to_width(value, width))
            })
            .collect()
    }

    /// Returns the trimmed key field values of `values`.
    #[must_use]
    pub fn key_of(&self, values: &[String]) -> Vec<String> {
        self.key
            .iter()
            .filter_map(|&i| values.get(i))
            .map(|v| trim_pad(v).to_string())
            .collect()
    }
}
