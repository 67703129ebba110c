#![forbid(unsafe_code)]
//! splitscan: batch-oriented split scanning for columnar files.
//!
//! Facade over the workspace crates:
//! - [`splitscan_core`]: schema, typed values, batch identities, scan configuration.
//! - [`splitscan_io`]: the split batch scanner, batch row resolvers, and split adapters.

pub use splitscan_core;
pub use splitscan_io;

pub use splitscan_core::prelude::*;
pub use splitscan_io::{
    BatchResolver, DataSourceRef, MemorySplits, ResolvedBatch, RowBatchResolver, RowDriver,
    RowUnit, ScanStats, SplitBatchScanner, SplitOpener, SplitReader,
};
