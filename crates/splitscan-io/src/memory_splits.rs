//! In-memory split source.
//!
//! Serves pre-built batches split by split. Used by tests and benches, and by
//! hosts that already hold decoded data. Clones share the same splits and
//! counters but each clone walks the splits with its own cursor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use splitscan_core::config::ScanConfig;

use crate::error::{Error, Result};
use crate::split::{DataSourceRef, SplitOpener, SplitReader};

#[derive(Debug, Default)]
struct Counters {
    opened: AtomicUsize,
    open_calls: AtomicUsize,
    live_readers: AtomicUsize,
    reused_buffers: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct MemorySplits<B> {
    splits: Arc<Vec<Arc<Vec<B>>>>,
    next: usize,
    fail_at: Option<usize>,
    fail_read: Option<(usize, usize)>,
    counters: Arc<Counters>,
}

impl<B> MemorySplits<B> {
    pub fn new(splits: Vec<Vec<B>>) -> Self {
        Self {
            splits: Arc::new(splits.into_iter().map(Arc::new).collect()),
            next: 0,
            fail_at: None,
            fail_read: None,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Make opening split `index` (0-based) fail.
    pub fn fail_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Make reading batch `batch` of split `split` (both 0-based) fail.
    /// A `batch` equal to the split's length fails the exhaustion check.
    pub fn fail_read_at(mut self, split: usize, batch: usize) -> Self {
        self.fail_read = Some((split, batch));
        self
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Splits successfully opened, across all clones.
    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::Relaxed)
    }

    /// Calls to `open_next`, including ones that found no split.
    pub fn open_calls(&self) -> usize {
        self.counters.open_calls.load(Ordering::Relaxed)
    }

    /// Readers currently alive.
    pub fn live_readers(&self) -> usize {
        self.counters.live_readers.load(Ordering::Relaxed)
    }

    /// Batches delivered into a recycled buffer instead of a fresh one.
    pub fn reused_buffers(&self) -> usize {
        self.counters.reused_buffers.load(Ordering::Relaxed)
    }
}

impl<B: Clone> SplitOpener for MemorySplits<B> {
    type Reader = MemorySplitReader<B>;

    fn open_next(
        &mut self,
        _source: &DataSourceRef,
        _config: &ScanConfig,
    ) -> Result<Option<Self::Reader>> {
        self.counters.open_calls.fetch_add(1, Ordering::Relaxed);
        let index = self.next;
        if self.fail_at == Some(index) {
            return Err(Error::Split {
                split: format!("memory[{index}]"),
                message: "injected open failure".into(),
            });
        }
        let Some(batches) = self.splits.get(index) else {
            return Ok(None);
        };
        self.next += 1;
        self.counters.opened.fetch_add(1, Ordering::Relaxed);
        self.counters.live_readers.fetch_add(1, Ordering::Relaxed);
        let fail_at_batch = match self.fail_read {
            Some((split, batch)) if split == index => Some(batch),
            _ => None,
        };
        Ok(Some(MemorySplitReader {
            batches: Arc::clone(batches),
            split: index,
            pos: 0,
            fail_at_batch,
            counters: Arc::clone(&self.counters),
        }))
    }
}

pub struct MemorySplitReader<B> {
    batches: Arc<Vec<B>>,
    split: usize,
    pos: usize,
    fail_at_batch: Option<usize>,
    counters: Arc<Counters>,
}

impl<B: Clone> SplitReader for MemorySplitReader<B> {
    type Batch = B;

    fn next_batch(&mut self, reuse: Option<B>) -> Result<Option<B>> {
        if self.fail_at_batch == Some(self.pos) {
            return Err(Error::Split {
                split: format!("memory[{}]", self.split),
                message: format!("injected read failure at batch {}", self.pos),
            });
        }
        let Some(template) = self.batches.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;
        let batch = match reuse {
            Some(mut buf) => {
                buf.clone_from(template);
                self.counters.reused_buffers.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => template.clone(),
        };
        Ok(Some(batch))
    }
}

impl<B> Drop for MemorySplitReader<B> {
    fn drop(&mut self) {
        self.counters.live_readers.fetch_sub(1, Ordering::Relaxed);
    }
}
