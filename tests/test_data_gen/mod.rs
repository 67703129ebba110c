//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use splitscan_core::schema::{DataType, Field, Schema};
use splitscan_core::types::{Column, RowBatch, Scalar};
use splitscan_io::MemorySplits;
use std::fs;
use std::path::PathBuf;

/// `id: Int64 not null, label: Utf8 nullable`
pub fn id_label_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("label", DataType::Utf8, true),
    ])
}

/// Batch of `rows` rows with ids `start..start + rows`; every third label is null.
pub fn id_label_batch(start: i64, rows: usize) -> RowBatch {
    let ids = (0..rows as i64).map(|i| Scalar::I64(start + i)).collect();
    let labels = (0..rows as i64)
        .map(|i| {
            let id = start + i;
            if id % 3 == 0 {
                Scalar::Null
            } else {
                Scalar::Str(format!("row-{id}"))
            }
        })
        .collect();
    RowBatch::new(vec![Column::new("id", ids), Column::new("label", labels)])
}

/// One split per entry of `batches_per_split`, each batch `rows_per_batch`
/// rows long, ids running contiguously across the whole source.
pub fn id_label_splits(
    batches_per_split: &[usize],
    rows_per_batch: usize,
) -> MemorySplits<RowBatch> {
    let mut next_id = 0i64;
    let splits: Vec<Vec<RowBatch>> = batches_per_split
        .iter()
        .map(|&n| {
            (0..n)
                .map(|_| {
                    let batch = id_label_batch(next_id, rows_per_batch);
                    next_id += rows_per_batch as i64;
                    batch
                })
                .collect()
        })
        .collect();
    MemorySplits::new(splits)
}

/// Splits of plain numbered batches, for tests that only care about sequencing.
/// Batch values are `split * 100 + index`.
pub fn numbered_splits(batches_per_split: &[usize]) -> MemorySplits<u32> {
    let splits: Vec<Vec<u32>> = batches_per_split
        .iter()
        .enumerate()
        .map(|(s, &n)| (0..n).map(|b| (s * 100 + b) as u32).collect())
        .collect();
    MemorySplits::new(splits)
}

pub fn create_temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("splitscan-tests-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
