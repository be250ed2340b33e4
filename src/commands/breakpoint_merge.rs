//! Index-gap merge: collapse the rows between consecutive breakpoints.
//!
//! For each adjacent pair `(prev, curr)` of the breakpoint list (sentinel
//! `-2` first), the rows `prev + 2 ..= curr + 1` become one interval. Its start
//! is the start of the first row, its end the start of the last row, and
//! the two value columns are averaged over the range.

use crate::breakpoints::BreakpointList;
use crate::config::OutputOptions;
use crate::interval::MergedInterval;
use crate::output::TsvWriter;
use crate::table::{read_breakpoint_rows, BreakpointRow, Result, TableError, TableSource};
use crate::value::{MeanAccumulator, Value};
use std::io::Write;
use std::path::Path;

/// Offset added to the current breakpoint to get the last row of a range.
pub const END_OFFSET: i64 = 1;
/// Offset added to the previous breakpoint to get the first row of a range.
pub const START_OFFSET: i64 = 2;

/// Output column names, used when a header is requested.
pub const BREAKPOINT_COLUMNS: [&str; 5] = ["chr", "start", "end", "z_score", "CN"];

/// Breakpoint merge command configuration.
#[derive(Debug, Clone)]
pub struct BreakpointMergeCommand {
    pub output: OutputOptions,
}

impl Default for BreakpointMergeCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakpointMergeCommand {
    /// Headerless output with `NaN` for all-missing averages.
    pub fn new() -> Self {
        Self {
            output: OutputOptions::headerless_nan(),
        }
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    /// Merge rows into one interval per breakpoint.
    ///
    /// Fails without producing anything if any breakpoint resolves to a row
    /// outside the table.
    pub fn merge(
        &self,
        rows: &[BreakpointRow],
        breakpoints: &BreakpointList,
    ) -> Result<Vec<MergedInterval>> {
        let mut result = Vec::with_capacity(breakpoints.len());

        for (prev, curr) in breakpoints.pairs() {
            let element = row_offset(curr, END_OFFSET, rows.len())?;
            let last_element = row_offset(prev, START_OFFSET, rows.len())?;

            let (z_score, cn) = if last_element <= element {
                average_range(&rows[last_element..=element])
            } else {
                log::warn!(
                    "Breakpoints {} and {} select an empty row range [{}, {}]",
                    prev,
                    curr,
                    last_element,
                    element
                );
                (Value::Missing, Value::Missing)
            };

            result.push(MergedInterval::new(
                rows[element].chrom.clone(),
                rows[last_element].start,
                rows[element].start,
                vec![z_score, cn],
            ));
        }

        Ok(result)
    }

    /// Run on a table file and a breakpoint list file.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>, W: Write>(
        &self,
        table: P,
        indices: Q,
        output: &mut W,
    ) -> Result<BreakpointMergeStats> {
        log::info!("Reading table: {}", table.as_ref().display());
        let source = TableSource::from_path(table)?;
        let rows = read_breakpoint_rows(&source)?;

        log::info!("Reading breakpoints: {}", indices.as_ref().display());
        let breakpoints = BreakpointList::from_path(indices)?;

        self.run_rows(&rows, &breakpoints, output)
    }

    /// Merge already-loaded rows and write the result.
    pub fn run_rows<W: Write>(
        &self,
        rows: &[BreakpointRow],
        breakpoints: &BreakpointList,
        output: &mut W,
    ) -> Result<BreakpointMergeStats> {
        let merged = self.merge(rows, breakpoints)?;

        let mut stats = BreakpointMergeStats {
            rows_read: rows.len(),
            breakpoints_read: breakpoints.len(),
            ..Default::default()
        };

        let mut writer = TsvWriter::new(output, self.output.na_rep.as_str());
        if self.output.header {
            writer.write_header(&BREAKPOINT_COLUMNS)?;
        }
        for interval in &merged {
            if interval.values[0].is_missing() {
                stats.missing_z_score += 1;
            }
            if interval.values[1].is_missing() {
                stats.missing_cn += 1;
            }
            writer.write_interval(interval)?;
            stats.intervals_written += 1;
        }
        writer.flush()?;

        log::debug!("Breakpoint merge stats: {}", stats);
        Ok(stats)
    }
}

/// Resolve `breakpoint + offset` to a row index, rejecting anything outside
/// `0..rows`.
fn row_offset(breakpoint: i64, offset: i64, rows: usize) -> Result<usize> {
    let row = breakpoint.saturating_add(offset);
    if row < 0 || row as u64 >= rows as u64 {
        return Err(TableError::BreakpointOutOfRange {
            breakpoint,
            offset: row,
            rows,
        });
    }
    Ok(row as usize)
}

/// Average both value columns over a row range.
fn average_range(rows: &[BreakpointRow]) -> (Value, Value) {
    let mut a = MeanAccumulator::default();
    let mut b = MeanAccumulator::default();
    for row in rows {
        a.push(row.value_a);
        b.push(row.value_b);
    }
    (a.finish(), b.finish())
}

/// Statistics from a breakpoint merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointMergeStats {
    pub rows_read: usize,
    pub breakpoints_read: usize,
    pub intervals_written: usize,
    pub missing_z_score: usize,
    pub missing_cn: usize,
}

impl std::fmt::Display for BreakpointMergeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rows: {}, Breakpoints: {}, Written: {}, Missing z_score: {}, Missing CN: {}",
            self.rows_read,
            self.breakpoints_read,
            self.intervals_written,
            self.missing_z_score,
            self.missing_cn
        )
    }
}
