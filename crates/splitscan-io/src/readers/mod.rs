//! Split adapters backed by real columnar decoders.

#[cfg(feature = "parquet")]
pub mod parquet;
