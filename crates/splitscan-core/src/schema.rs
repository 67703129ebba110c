//! Logical schema types. Pure data; no Arrow dependency here.
//!
//! A `Schema` is the externally supplied description of the output columns a
//! resolver produces. It is never derived from a batch by the core.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    Binary,
    /// Milliseconds since the Unix epoch.
    Date64,
    Decimal128 { precision: u8, scale: i8 },
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Decimal128 { precision, scale } => {
                write!(f, "Decimal128({precision}, {scale})")
            }
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reject schemas a resolver cannot key rows against: no columns, or
    /// duplicate column names.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::Schema("schema declares no columns".into()));
        }
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::Schema(format!(
                    "duplicate column name '{}'",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_duplicates_and_empty() {
        let dup = Schema::new(vec![
            Field::new("a", DataType::Int32, false),
            Field::new("a", DataType::Utf8, true),
        ]);
        let err = dup.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate column name 'a'"));

        assert!(Schema::new(vec![]).validate().is_err());
    }

    #[test]
    fn test_schema_json_shape() {
        let schema = Schema::new(vec![Field::new(
            "price",
            DataType::Decimal128 {
                precision: 10,
                scale: 2,
            },
            true,
        )]);
        let json = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
        assert_eq!(back.fields[0].data_type.to_string(), "Decimal128(10, 2)");
    }
}
