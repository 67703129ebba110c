//! Parquet split adapter (enabled with `--features parquet`).
//!
//! Every row group of every listed file is one split. Files are visited in
//! the order their locations are listed and row groups in file order. Footer
//! metadata is loaded once per file and shared by that file's splits.

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow_array::cast::AsArray;
use arrow_array::types::{
    Date32Type, Date64Type, Decimal128Type, Float32Type, Float64Type, Int16Type, Int32Type,
    Int64Type, Int8Type, UInt16Type, UInt32Type, UInt8Type,
};
use arrow_array::{
    Array, BinaryArray, BooleanArray, Date32Array, Date64Array, Decimal128Array, Float32Array,
    Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, LargeBinaryArray,
    LargeStringArray, RecordBatch, StringArray, UInt16Array, UInt32Array, UInt8Array,
};
use arrow_schema::{DataType as ArrowType, Schema as ArrowSchema};
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReader,
    ParquetRecordBatchReaderBuilder,
};
use splitscan_core::config::ScanConfig;
use splitscan_core::error::Error as CoreError;
use splitscan_core::schema::{DataType, Field, Schema};
use splitscan_core::types::{Row, Scalar};

use crate::error::{Error, Result};
use crate::resolve::{check_column_count, decode_error, decode_value, BatchResolver};
use crate::split::{DataSourceRef, SplitOpener, SplitReader};

const MILLIS_PER_DAY: i64 = 86_400_000;

struct OpenFile {
    path: PathBuf,
    metadata: ArrowReaderMetadata,
    next_row_group: usize,
}

#[derive(Default)]
pub struct ParquetSplitOpener {
    // resolved from the data source on the first open
    files: Option<Vec<PathBuf>>,
    next_file: usize,
    current: Option<OpenFile>,
}

impl ParquetSplitOpener {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_file(path: PathBuf) -> Result<OpenFile> {
        let file = File::open(&path).map_err(|e| split_error(&path, None, e))?;
        let metadata = ArrowReaderMetadata::load(&file, ArrowReaderOptions::new())
            .map_err(|e| split_error(&path, None, e))?;
        Ok(OpenFile {
            path,
            metadata,
            next_row_group: 0,
        })
    }
}

fn split_error(path: &Path, row_group: Option<usize>, e: impl std::fmt::Display) -> Error {
    let split = match row_group {
        Some(rg) => format!("{}#rg{rg}", path.display()),
        None => path.display().to_string(),
    };
    Error::Split {
        split,
        message: e.to_string(),
    }
}

impl SplitOpener for ParquetSplitOpener {
    type Reader = ParquetSplitReader;

    fn open_next(
        &mut self,
        source: &DataSourceRef,
        config: &ScanConfig,
    ) -> Result<Option<Self::Reader>> {
        config.validate()?;
        if self.files.is_none() {
            self.files = Some(source.file_paths()?);
        }

        loop {
            if let Some(open) = self.current.as_mut() {
                let row_groups = open.metadata.metadata().num_row_groups();
                if open.next_row_group < row_groups {
                    let rg = open.next_row_group;
                    open.next_row_group += 1;
                    let file =
                        File::open(&open.path).map_err(|e| split_error(&open.path, Some(rg), e))?;
                    let inner =
                        ParquetRecordBatchReaderBuilder::new_with_metadata(file, open.metadata.clone())
                            .with_batch_size(config.batch_size)
                            .with_row_groups(vec![rg])
                            .build()
                            .map_err(|e| split_error(&open.path, Some(rg), e))?;
                    #[cfg(feature = "tracing")]
                    tracing::trace!(path = %open.path.display(), row_group = rg, "parquet split");
                    return Ok(Some(ParquetSplitReader { inner }));
                }
                self.current = None;
            }

            let next = self
                .files
                .as_ref()
                .and_then(|files| files.get(self.next_file))
                .cloned();
            let Some(path) = next else {
                return Ok(None);
            };
            self.next_file += 1;
            self.current = Some(Self::open_file(path)?);
        }
    }
}

/// Reader over one row group.
pub struct ParquetSplitReader {
    inner: ParquetRecordBatchReader,
}

impl SplitReader for ParquetSplitReader {
    type Batch = RecordBatch;

    /// Arrow arrays are immutable, so a recycled batch is simply dropped.
    fn next_batch(&mut self, _reuse: Option<RecordBatch>) -> Result<Option<RecordBatch>> {
        Ok(self.inner.next().transpose()?)
    }
}

/// Declared output schema for a Parquet file's Arrow schema.
pub fn schema_from_arrow(arrow: &ArrowSchema) -> Result<Schema> {
    let fields = arrow
        .fields()
        .iter()
        .map(|f| -> Result<Field> {
            let data_type = match f.data_type() {
                ArrowType::Boolean => DataType::Boolean,
                ArrowType::Int8
                | ArrowType::Int16
                | ArrowType::Int32
                | ArrowType::UInt8
                | ArrowType::UInt16 => DataType::Int32,
                ArrowType::Int64 | ArrowType::UInt32 => DataType::Int64,
                ArrowType::Float32 => DataType::Float32,
                ArrowType::Float64 => DataType::Float64,
                ArrowType::Utf8 | ArrowType::LargeUtf8 => DataType::Utf8,
                ArrowType::Binary | ArrowType::LargeBinary => DataType::Binary,
                ArrowType::Date32 | ArrowType::Date64 => DataType::Date64,
                ArrowType::Decimal128(precision, scale) => DataType::Decimal128 {
                    precision: *precision,
                    scale: *scale,
                },
                other => {
                    return Err(CoreError::Schema(format!(
                        "column '{}' has unsupported type {other}",
                        f.name()
                    ))
                    .into())
                }
            };
            Ok(Field::new(f.name().clone(), data_type, f.is_nullable()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Schema::new(fields))
}

/// Read the footer of one Parquet file and derive its declared schema.
pub fn read_parquet_schema(path: &Path) -> Result<Schema> {
    let file = File::open(path).map_err(|e| split_error(path, None, e))?;
    let metadata = ArrowReaderMetadata::load(&file, ArrowReaderOptions::new())?;
    schema_from_arrow(metadata.schema())
}

/// Pre-downcast column view; one per column per resolved batch.
enum TypedColumn<'a> {
    Bool(&'a BooleanArray),
    Int8(&'a Int8Array),
    Int16(&'a Int16Array),
    Int32(&'a Int32Array),
    Int64(&'a Int64Array),
    UInt8(&'a UInt8Array),
    UInt16(&'a UInt16Array),
    UInt32(&'a UInt32Array),
    Float32(&'a Float32Array),
    Float64(&'a Float64Array),
    Utf8(&'a StringArray),
    LargeUtf8(&'a LargeStringArray),
    Binary(&'a BinaryArray),
    LargeBinary(&'a LargeBinaryArray),
    Date32(&'a Date32Array),
    Date64(&'a Date64Array),
    Decimal128(&'a Decimal128Array, i8),
    Unsupported(&'a ArrowType),
}

struct ColumnAccessor<'a> {
    array: &'a dyn Array,
    typed: TypedColumn<'a>,
}

impl<'a> ColumnAccessor<'a> {
    fn new(array: &'a dyn Array) -> Self {
        let typed = match array.data_type() {
            ArrowType::Boolean => TypedColumn::Bool(array.as_boolean()),
            ArrowType::Int8 => TypedColumn::Int8(array.as_primitive::<Int8Type>()),
            ArrowType::Int16 => TypedColumn::Int16(array.as_primitive::<Int16Type>()),
            ArrowType::Int32 => TypedColumn::Int32(array.as_primitive::<Int32Type>()),
            ArrowType::Int64 => TypedColumn::Int64(array.as_primitive::<Int64Type>()),
            ArrowType::UInt8 => TypedColumn::UInt8(array.as_primitive::<UInt8Type>()),
            ArrowType::UInt16 => TypedColumn::UInt16(array.as_primitive::<UInt16Type>()),
            ArrowType::UInt32 => TypedColumn::UInt32(array.as_primitive::<UInt32Type>()),
            ArrowType::Float32 => TypedColumn::Float32(array.as_primitive::<Float32Type>()),
            ArrowType::Float64 => TypedColumn::Float64(array.as_primitive::<Float64Type>()),
            ArrowType::Utf8 => TypedColumn::Utf8(array.as_string::<i32>()),
            ArrowType::LargeUtf8 => TypedColumn::LargeUtf8(array.as_string::<i64>()),
            ArrowType::Binary => TypedColumn::Binary(array.as_binary::<i32>()),
            ArrowType::LargeBinary => TypedColumn::LargeBinary(array.as_binary::<i64>()),
            ArrowType::Date32 => TypedColumn::Date32(array.as_primitive::<Date32Type>()),
            ArrowType::Date64 => TypedColumn::Date64(array.as_primitive::<Date64Type>()),
            ArrowType::Decimal128(_, scale) => {
                TypedColumn::Decimal128(array.as_primitive::<Decimal128Type>(), *scale)
            }
            other => TypedColumn::Unsupported(other),
        };
        Self { array, typed }
    }

    /// Stored value at `row`, or the unsupported Arrow type.
    fn stored(&self, row: usize) -> std::result::Result<Scalar, &'a ArrowType> {
        if let TypedColumn::Unsupported(dt) = &self.typed {
            return Err(*dt);
        }
        if self.array.is_null(row) {
            return Ok(Scalar::Null);
        }
        let value = match &self.typed {
            TypedColumn::Bool(a) => Scalar::Bool(a.value(row)),
            TypedColumn::Int8(a) => Scalar::I32(i32::from(a.value(row))),
            TypedColumn::Int16(a) => Scalar::I32(i32::from(a.value(row))),
            TypedColumn::Int32(a) => Scalar::I32(a.value(row)),
            TypedColumn::Int64(a) => Scalar::I64(a.value(row)),
            TypedColumn::UInt8(a) => Scalar::I32(i32::from(a.value(row))),
            TypedColumn::UInt16(a) => Scalar::I32(i32::from(a.value(row))),
            TypedColumn::UInt32(a) => Scalar::I64(i64::from(a.value(row))),
            TypedColumn::Float32(a) => Scalar::F32(a.value(row)),
            TypedColumn::Float64(a) => Scalar::F64(a.value(row)),
            TypedColumn::Utf8(a) => Scalar::Str(a.value(row).to_string()),
            TypedColumn::LargeUtf8(a) => Scalar::Str(a.value(row).to_string()),
            TypedColumn::Binary(a) => Scalar::Bin(a.value(row).to_vec()),
            TypedColumn::LargeBinary(a) => Scalar::Bin(a.value(row).to_vec()),
            TypedColumn::Date32(a) => Scalar::Date64(i64::from(a.value(row)) * MILLIS_PER_DAY),
            TypedColumn::Date64(a) => Scalar::Date64(a.value(row)),
            TypedColumn::Decimal128(a, scale) => Scalar::Decimal128 {
                value: a.value(row),
                scale: *scale,
            },
            TypedColumn::Unsupported(dt) => return Err(*dt),
        };
        Ok(value)
    }
}

/// Resolves Arrow `RecordBatch`es positionally against a declared schema.
#[derive(Debug, Clone)]
pub struct ArrowBatchResolver {
    schema: Schema,
}

impl ArrowBatchResolver {
    pub fn new(schema: Schema) -> Result<Self> {
        schema.validate()?;
        Ok(Self { schema })
    }
}

impl BatchResolver<RecordBatch> for ArrowBatchResolver {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn resolve(&self, batch: &RecordBatch) -> Result<Vec<Row>> {
        check_column_count(&self.schema, batch.num_columns())?;
        let columns: Vec<ColumnAccessor<'_>> = batch
            .columns()
            .iter()
            .map(|array| ColumnAccessor::new(array.as_ref()))
            .collect();

        let num_rows = batch.num_rows();
        let mut rows = Vec::with_capacity(num_rows);
        for row_idx in 0..num_rows {
            let mut row = Vec::with_capacity(columns.len());
            for (field, column) in self.schema.fields.iter().zip(&columns) {
                let stored = column.stored(row_idx).map_err(|dt| {
                    decode_error(row_idx, field, format!("stored Arrow type {dt} is not supported"))
                })?;
                row.push(decode_value(&stored, field, row_idx)?);
            }
            rows.push(row);
        }
        Ok(rows)
    }
}
