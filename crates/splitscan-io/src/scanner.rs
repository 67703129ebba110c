//! Split batch scanner.
//!
//! Pulls batches split by split and stamps each one with a scan-wide
//! `BatchSeq`. When the current split runs dry the scanner opens exactly one
//! more split and asks it for a first batch; if that split is empty too the
//! scan ends, even if later splits hold data.

use serde::{Deserialize, Serialize};
use splitscan_core::config::ScanConfig;
use splitscan_core::id::BatchSeq;

use crate::error::{Error, Result};
use crate::split::{DataSourceRef, SplitOpener, SplitReader};

/// Batch type produced by an opener's readers.
pub type BatchOf<O> = <<O as SplitOpener>::Reader as SplitReader>::Batch;

/// A batch paired with its sequence number: the unit handed to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RowUnit<B> {
    pub seq: BatchSeq,
    pub batch: B,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub splits_opened: u64,
    pub batches_emitted: u64,
    pub exhausted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Active,
    Exhausted,
    Failed,
}

pub struct SplitBatchScanner<O: SplitOpener> {
    source: DataSourceRef,
    config: ScanConfig,
    opener: O,
    current: Option<O::Reader>,
    last_seq: BatchSeq,
    splits_opened: u64,
    spare: Option<BatchOf<O>>,
    state: ScanState,
}

impl<O: SplitOpener> SplitBatchScanner<O> {
    pub fn new(source: DataSourceRef, config: ScanConfig, opener: O) -> Self {
        Self {
            source,
            config,
            opener,
            current: None,
            last_seq: BatchSeq::START,
            splits_opened: 0,
            spare: None,
            state: ScanState::Active,
        }
    }

    pub fn source(&self) -> &DataSourceRef {
        &self.source
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Sequence number of the most recently emitted batch (`START` before any).
    pub fn last_seq(&self) -> BatchSeq {
        self.last_seq
    }

    pub fn stats(&self) -> ScanStats {
        ScanStats {
            splits_opened: self.splits_opened,
            batches_emitted: self.last_seq.get(),
            exhausted: self.state == ScanState::Exhausted,
        }
    }

    /// Hand a spent batch back; the next batch request offers it to the
    /// split reader for reuse.
    pub fn recycle(&mut self, batch: BatchOf<O>) {
        self.spare = Some(batch);
    }

    /// Next unit of work, or `None` at end of data.
    pub fn next_unit(&mut self) -> Result<Option<RowUnit<BatchOf<O>>>> {
        match self.state {
            ScanState::Active => {}
            ScanState::Exhausted => return Ok(None),
            ScanState::Failed => return Err(Error::ScanAborted),
        }
        let step = self.step();
        if step.is_err() {
            self.state = ScanState::Failed;
            self.current = None;
            #[cfg(feature = "tracing")]
            tracing::debug!(last_seq = self.last_seq.get(), "scan aborted");
        }
        step
    }

    fn step(&mut self) -> Result<Option<RowUnit<BatchOf<O>>>> {
        if self.current.is_none() && !self.open_next_split()? {
            return Ok(self.finish());
        }
        if let Some(batch) = self.pull()? {
            return Ok(Some(self.emit(batch)));
        }

        // Current split is dry: look ahead exactly one split.
        if !self.open_next_split()? {
            return Ok(self.finish());
        }
        match self.pull()? {
            Some(batch) => Ok(Some(self.emit(batch))),
            None => Ok(self.finish()),
        }
    }

    /// Release the current reader, then open the next split. Returns whether
    /// a split was opened.
    fn open_next_split(&mut self) -> Result<bool> {
        self.current = None;
        match self.opener.open_next(&self.source, &self.config)? {
            Some(reader) => {
                self.splits_opened += 1;
                #[cfg(feature = "tracing")]
                tracing::trace!(split = self.splits_opened, "opened split");
                self.current = Some(reader);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn pull(&mut self) -> Result<Option<BatchOf<O>>> {
        let reuse = self.spare.take();
        match self.current.as_mut() {
            Some(reader) => reader.next_batch(reuse),
            None => Ok(None),
        }
    }

    fn emit(&mut self, batch: BatchOf<O>) -> RowUnit<BatchOf<O>> {
        self.last_seq = self.last_seq.next();
        RowUnit {
            seq: self.last_seq,
            batch,
        }
    }

    fn finish<T>(&mut self) -> Option<T> {
        self.current = None;
        self.spare = None;
        self.state = ScanState::Exhausted;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            splits = self.splits_opened,
            batches = self.last_seq.get(),
            "end of data"
        );
        None
    }
}

impl<O: SplitOpener> Iterator for SplitBatchScanner<O> {
    type Item = Result<RowUnit<BatchOf<O>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ScanState::Failed {
            return None;
        }
        self.next_unit().transpose()
    }
}
