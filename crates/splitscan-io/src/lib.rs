#![forbid(unsafe_code)]
//! splitscan-io: batch-oriented split scanning and batch-to-row resolution.
//!
//! - `split`: the collaborator seams (`SplitOpener`, `SplitReader`) and the
//!   immutable `DataSourceRef`.
//! - `scanner`: `SplitBatchScanner`, which sequences splits and stamps every
//!   batch with a scan-wide `BatchSeq`.
//! - `resolve`: the `BatchResolver` contract and the `RowBatch` resolver.
//! - `driver`: `RowDriver`, the pull loop pairing a scanner with a resolver.
//! - `memory_splits`: in-memory split source for tests and pre-decoded data.
//! - `readers::parquet` (feature `parquet`): row-group splits over Parquet files
//!   and the Arrow batch resolver.
//! - `writers::jsonl`: NDJSON output of resolved rows for hosts.

pub mod driver;
pub mod error;
pub mod memory_splits;
pub mod readers;
pub mod resolve;
pub mod scanner;
pub mod split;
pub mod writers;

pub use driver::{ResolvedBatch, RowDriver};
pub use error::{Error, Result};
pub use memory_splits::MemorySplits;
pub use resolve::{BatchResolver, RowBatchResolver};
pub use scanner::{RowUnit, ScanStats, SplitBatchScanner};
pub use split::{DataSourceRef, SplitOpener, SplitReader};
