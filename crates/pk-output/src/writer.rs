//! The `OutputWriter` trait implemented by backend writers.

use crate::{CarEventRow, LotSnapshotRow, OutputResult};

/// Sink for lot snapshots and car events.
///
/// Writers are driven from concurrent car tasks through
/// [`OutputObserver`][crate::OutputObserver], which serialises access, so a
/// writer only needs to be `Send`.
pub trait OutputWriter: Send {
    /// Write one sample: a row per lot.
    fn write_snapshots(&mut self, rows: &[LotSnapshotRow]) -> OutputResult<()>;

    /// Write one car event row.
    fn write_event(&mut self, row: &CarEventRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
