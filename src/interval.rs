//! Merged interval type shared by both pipelines.

use crate::value::Value;

/// A merged genomic interval with its averaged signal values.
///
/// Coordinates are the positions as they appear in the input table; `end` is
/// inclusive for position runs.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub values: Vec<Value>,
}

impl MergedInterval {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64, values: Vec<Value>) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            values,
        }
    }

    /// Number of positions covered, counting both ends.
    #[inline]
    pub fn span(&self) -> u64 {
        self.end.saturating_sub(self.start) + 1
    }
}
