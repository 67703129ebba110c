//! Scan configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum number of rows the decoder places in one batch.
    pub batch_size: usize,

    /// Hand resolved batches back to the scanner so split readers can reuse
    /// their storage for the next batch.
    pub reuse_batches: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: 1024,
            reuse_batches: true,
        }
    }
}

impl ScanConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `SPLITSCAN_BATCH_SIZE`: rows per batch
    /// - `SPLITSCAN_REUSE_BATCHES`: `true`/`false`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("SPLITSCAN_BATCH_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.batch_size = v;
            }
        }

        if let Ok(s) = std::env::var("SPLITSCAN_REUSE_BATCHES") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.reuse_batches = v;
            }
        }

        cfg
    }
}
