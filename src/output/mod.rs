//! Output sinks for measurement results.

pub mod json;
mod terminal;

pub use terminal::PrintSink;

use crate::result::ResultRecord;

/// Consumer of finished measurement records.
///
/// Implementations must tolerate absent `pkg`/`dram`/confidence fields —
/// a record from unsupported hardware carries only label, timestamp and
/// duration.
pub trait OutputSink {
    /// Take one finished record for display or export.
    fn add(&mut self, record: &ResultRecord);
}

/// Sink that buffers records in memory.
///
/// Handy for tests and for programs that post-process records instead of
/// printing them.
#[derive(Debug, Default)]
pub struct BufferSink {
    records: Vec<ResultRecord>,
}

impl BufferSink {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, in arrival order.
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Consume the sink, keeping its records.
    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }
}

impl OutputSink for BufferSink {
    fn add(&mut self, record: &ResultRecord) {
        self.records.push(record.clone());
    }
}
