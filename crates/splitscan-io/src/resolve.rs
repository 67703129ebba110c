//! Batch-to-row resolution.
//!
//! A resolver unpacks one batch into rows of typed values keyed positionally
//! to a declared `Schema`. It either returns every row of the batch, in
//! stored order, or fails; it never hands back a partial row set.

use splitscan_core::error::Error as CoreError;
use splitscan_core::schema::{Field, Schema};
use splitscan_core::types::{Row, RowBatch, Scalar};

use crate::error::{Error, Result};

pub trait BatchResolver<B> {
    /// Declared output columns.
    fn schema(&self) -> &Schema;

    /// Rows of `batch` in stored order; exactly one row per batch row.
    fn resolve(&self, batch: &B) -> Result<Vec<Row>>;
}

/// Decode one stored value against its declared field.
pub(crate) fn decode_value(value: &Scalar, field: &Field, row: usize) -> Result<Scalar> {
    if value.is_null() {
        if field.nullable {
            return Ok(Scalar::Null);
        }
        return Err(decode_error(row, field, "null in non-nullable column".into()));
    }
    value.decode_as(&field.data_type).ok_or_else(|| {
        decode_error(
            row,
            field,
            format!(
                "stored {} cannot be decoded as {}",
                value.type_name(),
                field.data_type
            ),
        )
    })
}

pub(crate) fn decode_error(row: usize, field: &Field, message: String) -> Error {
    CoreError::Decode {
        row,
        column: field.name.clone(),
        message,
    }
    .into()
}

pub(crate) fn check_column_count(schema: &Schema, found: usize) -> Result<()> {
    if schema.len() != found {
        return Err(CoreError::Schema(format!(
            "batch has {found} columns, schema declares {}",
            schema.len()
        ))
        .into());
    }
    Ok(())
}

/// Resolves the core column-major `RowBatch`.
#[derive(Debug, Clone)]
pub struct RowBatchResolver {
    schema: Schema,
}

impl RowBatchResolver {
    pub fn new(schema: Schema) -> Result<Self> {
        schema.validate()?;
        Ok(Self { schema })
    }
}

impl BatchResolver<RowBatch> for RowBatchResolver {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn resolve(&self, batch: &RowBatch) -> Result<Vec<Row>> {
        check_column_count(&self.schema, batch.num_columns())?;
        batch.check_rectangular()?;

        let num_rows = batch.num_rows();
        let mut rows = Vec::with_capacity(num_rows);
        for row_idx in 0..num_rows {
            let mut row = Vec::with_capacity(self.schema.len());
            for (field, column) in self.schema.fields.iter().zip(&batch.columns) {
                row.push(decode_value(&column.values[row_idx], field, row_idx)?);
            }
            rows.push(row);
        }
        Ok(rows)
    }
}
