//! Typed field values and the minimal column-major batch.
//!
//! `Scalar` is the unit of a resolved row. `RowBatch` is the decoder-agnostic
//! batch used by in-memory split sources; Arrow-backed batches live in
//! `splitscan-io` behind the `parquet` feature and resolve to the same
//! `Scalar`s.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::DataType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
    /// Milliseconds since the Unix epoch.
    Date64(i64),
    Decimal128 { value: i128, scale: i8 },
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Short name of the stored representation, used in decode errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "Null",
            Scalar::Bool(_) => "Bool",
            Scalar::I32(_) => "I32",
            Scalar::I64(_) => "I64",
            Scalar::F32(_) => "F32",
            Scalar::F64(_) => "F64",
            Scalar::Str(_) => "Str",
            Scalar::Bin(_) => "Bin",
            Scalar::Date64(_) => "Date64",
            Scalar::Decimal128 { .. } => "Decimal128",
        }
    }

    /// Decode this stored value as `target`.
    ///
    /// Only lossless widenings of the physical representation are accepted
    /// (`I32 -> Int64`, `F32 -> Float64`); everything else must already match.
    /// `Null` decodes to `Null` for any target, nullability is checked by the
    /// resolver against the field.
    pub fn decode_as(&self, target: &DataType) -> Option<Scalar> {
        use Scalar::*;
        match (self, target) {
            (Null, _) => Some(Null),
            (Bool(_), DataType::Boolean)
            | (I32(_), DataType::Int32)
            | (I64(_), DataType::Int64)
            | (F32(_), DataType::Float32)
            | (F64(_), DataType::Float64)
            | (Str(_), DataType::Utf8)
            | (Bin(_), DataType::Binary)
            | (Date64(_), DataType::Date64) => Some(self.clone()),
            (I32(v), DataType::Int64) => Some(I64(i64::from(*v))),
            (F32(v), DataType::Float64) => Some(F64(f64::from(*v))),
            (Decimal128 { value, scale }, DataType::Decimal128 { precision, scale: s })
                if scale == s && decimal_fits(*value, *precision) =>
            {
                Some(self.clone())
            }
            _ => None,
        }
    }
}

fn decimal_fits(value: i128, precision: u8) -> bool {
    // i128 holds at most 38 full decimal digits.
    if precision >= 39 {
        return true;
    }
    let bound = 10i128.pow(u32::from(precision));
    value.unsigned_abs() < bound.unsigned_abs()
}

/// One resolved row: one value per declared output column, in schema order.
pub type Row = Vec<Scalar>;

/// Minimal column representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Column-major batch of rows decoded from one split.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl Clone for RowBatch {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.refill_from(source);
    }
}

impl RowBatch {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Every column must carry exactly `num_rows()` values.
    pub fn check_rectangular(&self) -> Result<()> {
        let rows = self.num_rows();
        match self.columns.iter().find(|c| c.len() != rows) {
            Some(col) => Err(Error::Invariant(format!(
                "column '{}' has {} values, expected {}",
                col.name,
                col.len(),
                rows
            ))),
            None => Ok(()),
        }
    }

    /// Overwrite this batch with the contents of `src`, keeping the existing
    /// column allocations where possible.
    pub fn refill_from(&mut self, src: &RowBatch) {
        self.columns.truncate(src.columns.len());
        for (dst, col) in self.columns.iter_mut().zip(&src.columns) {
            dst.name.clone_from(&col.name);
            dst.values.clone_from(&col.values);
        }
        let have = self.columns.len();
        self.columns.extend(src.columns[have..].iter().cloned());
    }
}
