//! Convenient re-exports for downstream crates.

pub use crate::config::ScanConfig;
pub use crate::error::{Error, Result};
pub use crate::id::BatchSeq;
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, Row, RowBatch, Scalar};
