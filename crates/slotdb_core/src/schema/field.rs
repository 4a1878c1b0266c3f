//! Field descriptors.

use serde::Serialize;
use std::fmt;

/// The type a field's text is interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldType {
    /// Free text, compared case-insensitively.
    Text,
    /// Decimal integer; empty text means "unset".
    Integer,
    /// Currency symbol followed by an amount, e.g. `$42.50`.
    Money,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Money => "money",
        };
        f.write_str(name)
    }
}

/// Describes one fixed-width field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field name as stored in the file header.
    pub name: String,
    /// Width of the field in bytes.
    pub length: u16,
    /// How the field's text is typed.
    pub field_type: FieldType,
}

impl FieldDescriptor {
    /// Creates a field descriptor.
    pub fn new(name: impl Into<String>, length: u16, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            length,
            field_type,
        }
    }

    /// Creates a text field.
    pub fn text(name: impl Into<String>, length: u16) -> Self {
        Self::new(name, length, FieldType::Text)
    }

    /// Creates an integer field.
    pub fn integer(name: impl Into<String>, length: u16) -> Self {
        Self::new(name, length, FieldType::Integer)
    }

    /// Creates a money field.
    pub fn money(name: impl Into<String>, length: u16) -> Self {
        Self::new(name, length, FieldType::Money)
    }
}
