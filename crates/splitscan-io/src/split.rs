//! Collaborator seams for the scanner.
//!
//! A `SplitOpener` walks an ordered, finite sequence of splits of one data
//! source; each opened split is a `SplitReader` that yields batches until it
//! reports exhaustion. Both are synchronous and either succeed or fail loudly.

use std::path::PathBuf;

use splitscan_core::config::ScanConfig;
use url::Url;

use crate::error::{Error, Result};

/// Immutable locator for the dataset being scanned.
///
/// Locations are bare filesystem paths or `file://` URIs. What a location
/// means (a file, an in-memory name, ...) is up to the opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceRef {
    locations: Vec<String>,
}

impl DataSourceRef {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            locations: vec![location.into()],
        }
    }

    pub fn from_locations<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locations: locations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Resolve every location to a local path.
    pub fn file_paths(&self) -> Result<Vec<PathBuf>> {
        self.locations.iter().map(|l| location_to_path(l)).collect()
    }
}

fn location_to_path(location: &str) -> Result<PathBuf> {
    if !location.contains("://") {
        return Ok(PathBuf::from(location));
    }
    let url = Url::parse(location)
        .map_err(|e| Error::Config(format!("invalid location '{location}': {e}")))?;
    match url.scheme() {
        "file" => url
            .to_file_path()
            .map_err(|_| Error::Config(format!("location '{location}' is not a local path"))),
        other => Err(Error::Config(format!(
            "unsupported location scheme '{other}'"
        ))),
    }
}

/// A live handle over one open split.
pub trait SplitReader {
    type Batch;

    /// Next batch of this split, or `None` exactly at split exhaustion.
    ///
    /// `reuse` is a previously delivered batch whose storage the reader may
    /// recycle; readers are free to ignore it.
    fn next_batch(&mut self, reuse: Option<Self::Batch>) -> Result<Option<Self::Batch>>;
}

/// Opens successive splits of a data source.
pub trait SplitOpener {
    type Reader: SplitReader;

    /// Open the next split, or `Ok(None)` once no splits remain.
    fn open_next(
        &mut self,
        source: &DataSourceRef,
        config: &ScanConfig,
    ) -> Result<Option<Self::Reader>>;
}
