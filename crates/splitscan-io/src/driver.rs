//! Row-iteration driver: the pull loop that feeds scanner units to a resolver.

use splitscan_core::id::BatchSeq;
use splitscan_core::types::Row;

use crate::error::Result;
use crate::resolve::BatchResolver;
use crate::scanner::{BatchOf, ScanStats, SplitBatchScanner};
use crate::split::SplitOpener;

/// Rows of one batch, tagged with the batch's cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBatch {
    pub seq: BatchSeq,
    pub rows: Vec<Row>,
}

pub struct RowDriver<O: SplitOpener, R> {
    scanner: SplitBatchScanner<O>,
    resolver: R,
    resume_after: BatchSeq,
    failed: bool,
}

impl<O, R> RowDriver<O, R>
where
    O: SplitOpener,
    R: BatchResolver<BatchOf<O>>,
{
    pub fn new(scanner: SplitBatchScanner<O>, resolver: R) -> Self {
        Self {
            scanner,
            resolver,
            resume_after: BatchSeq::START,
            failed: false,
        }
    }

    /// Skip every unit up to and including `cursor` without resolving it.
    ///
    /// Cursors are stable across scans of the same source because splits and
    /// batches are delivered in a fixed order.
    pub fn resume_after(mut self, cursor: BatchSeq) -> Self {
        self.resume_after = cursor;
        self
    }

    pub fn stats(&self) -> ScanStats {
        self.scanner.stats()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolve the next batch past the resume cursor, or `None` at end of data.
    pub fn next_resolved(&mut self) -> Result<Option<ResolvedBatch>> {
        let reuse = self.scanner.config().reuse_batches;
        while let Some(unit) = self.scanner.next_unit()? {
            if unit.seq <= self.resume_after {
                if reuse {
                    self.scanner.recycle(unit.batch);
                }
                continue;
            }
            let rows = self.resolver.resolve(&unit.batch)?;
            if reuse {
                self.scanner.recycle(unit.batch);
            }
            return Ok(Some(ResolvedBatch {
                seq: unit.seq,
                rows,
            }));
        }
        Ok(None)
    }
}

impl<O, R> Iterator for RowDriver<O, R>
where
    O: SplitOpener,
    R: BatchResolver<BatchOf<O>>,
{
    type Item = Result<ResolvedBatch>;

    /// Stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_resolved().transpose();
        self.failed = matches!(item, Some(Err(_)));
        item
    }
}
