//! Streaming NDJSON writer for resolved rows.

use std::fs::File;
use std::io::{BufWriter, Write};

use serde_json::{Map, Value};
use splitscan_core::schema::Schema;
use splitscan_core::types::{Row, Scalar};

use crate::error::Result;

pub struct JsonlRowWriter<W: Write> {
    writer: BufWriter<W>,
    // schema order keeps keys stable across batches
    columns: Vec<String>,
    rows_written: u64,
}

impl JsonlRowWriter<File> {
    pub fn to_path(path: &str, schema: &Schema) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f, schema))
    }
}

impl<W: Write> JsonlRowWriter<W> {
    pub fn to_writer(writer: W, schema: &Schema) -> Self {
        Self {
            writer: BufWriter::new(writer),
            columns: schema.fields.iter().map(|f| f.name.clone()).collect(),
            rows_written: 0,
        }
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Write rows as one JSON object per line.
    pub fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        for row in rows {
            let mut obj = Map::with_capacity(self.columns.len());
            for (name, value) in self.columns.iter().zip(row) {
                obj.insert(name.clone(), scalar_to_json(value));
            }
            serde_json::to_writer(&mut self.writer, &obj)?;
            self.writer.write_all(b"\n")?;
            self.rows_written += 1;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn scalar_to_json(v: &Scalar) -> Value {
    use Scalar::*;
    match v {
        Null => Value::Null,
        Bool(b) => Value::Bool(*b),
        I32(i) => Value::from(*i),
        I64(i) => Value::from(*i),
        F32(f) => Value::from(f64::from(*f)),
        F64(f) => Value::from(*f),
        Str(s) => Value::String(s.clone()),
        Bin(b) => Value::Array(b.iter().map(|byte| Value::from(*byte)).collect()),
        Date64(ms) => Value::from(*ms),
        // Exact decimal text; JSON numbers would lose precision.
        Decimal128 { value, scale } => Value::String(format_decimal(*value, *scale)),
    }
}

fn format_decimal(value: i128, scale: i8) -> String {
    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{value}{zeros}");
    }
    let scale = scale as usize;
    let digits = value.unsigned_abs().to_string();
    let sign = if value < 0 { "-" } else { "" };
    if digits.len() > scale {
        let (int, frac) = digits.split_at(digits.len() - scale);
        format!("{sign}{int}.{frac}")
    } else {
        format!("{sign}0.{digits:0>scale$}")
    }
}
