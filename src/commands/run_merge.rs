//! Run merge: collapse consecutive positions within each chromosome.
//!
//! Rows are sorted by (chromosome, position). A run ends wherever a position
//! is not exactly one past the previous one. Each run becomes one interval
//! spanning its first and last position, with every signal column averaged.

use crate::config::{default_signal_columns, OutputOptions};
use crate::interval::MergedInterval;
use crate::output::TsvWriter;
use crate::table::{read_position_rows, PositionRow, Result, TableSource};
use crate::value::MeanAccumulator;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::io::Write;
use std::path::Path;

/// Header name of the chromosome column.
pub const CHROM_COLUMN: &str = "Chr";
/// Header name of the position column.
pub const POSITION_COLUMN: &str = "Position";

/// How chromosome labels are ordered in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromOrder {
    /// Every label is an integer: `2` sorts before `10`.
    Numeric,
    /// Byte-wise string order: `chr10` sorts before `chr2`.
    Lexical,
}

impl ChromOrder {
    /// Numeric if every label parses as an integer, lexical otherwise.
    pub fn detect<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        if labels.into_iter().all(|c| c.trim().parse::<i64>().is_ok()) {
            ChromOrder::Numeric
        } else {
            ChromOrder::Lexical
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            ChromOrder::Numeric => {
                let na = a.trim().parse::<i64>().unwrap_or(i64::MAX);
                let nb = b.trim().parse::<i64>().unwrap_or(i64::MAX);
                na.cmp(&nb).then_with(|| a.cmp(b))
            }
            ChromOrder::Lexical => a.cmp(b),
        }
    }
}

/// Run merge command configuration.
#[derive(Debug, Clone)]
pub struct RunMergeCommand {
    /// Columns averaged over each run, in output order
    pub signal_columns: Vec<String>,
    pub output: OutputOptions,
}

impl Default for RunMergeCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl RunMergeCommand {
    pub fn new() -> Self {
        Self {
            signal_columns: default_signal_columns(),
            output: OutputOptions::default(),
        }
    }

    /// Set the signal columns to average.
    pub fn with_signal_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signal_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    /// Output header: `Chr  start  end  <column>_mean...`.
    pub fn header(&self) -> Vec<String> {
        let mut columns = vec![
            CHROM_COLUMN.to_string(),
            "start".to_string(),
            "end".to_string(),
        ];
        columns.extend(self.signal_columns.iter().map(|c| format!("{}_mean", c)));
        columns
    }

    /// Merge rows into one interval per maximal run of consecutive positions.
    ///
    /// Input order does not matter. Output is ordered by chromosome, then
    /// start.
    pub fn merge(&self, rows: Vec<PositionRow>) -> Vec<MergedInterval> {
        let (merged, _) = self.merge_with_stats(rows);
        merged
    }

    fn merge_with_stats(&self, rows: Vec<PositionRow>) -> (Vec<MergedInterval>, RunMergeStats) {
        let mut stats = RunMergeStats {
            rows_read: rows.len(),
            ..Default::default()
        };
        if rows.is_empty() {
            return (Vec::new(), stats);
        }

        // Group by chromosome, keeping input order within each group
        let mut groups: FxHashMap<String, Vec<PositionRow>> = FxHashMap::default();
        for row in rows {
            groups.entry(row.chrom.clone()).or_default().push(row);
        }

        let order = ChromOrder::detect(groups.keys().map(String::as_str));
        let mut chroms: Vec<String> = groups.keys().cloned().collect();
        chroms.sort_by(|a, b| order.compare(a, b));
        stats.chromosomes = chroms.len();
        log::debug!("Merging {} chromosomes ({:?} order)", chroms.len(), order);

        let mut result = Vec::new();
        for chrom in &chroms {
            let Some(mut rows) = groups.remove(chrom) else {
                continue;
            };
            // Stable, so duplicate positions keep their input order
            rows.sort_by_key(|r| r.position);

            let before = result.len();
            self.merge_chromosome(chrom, &rows, &mut result, &mut stats);
            log::debug!(
                "{}: {} rows -> {} runs",
                chrom,
                rows.len(),
                result.len() - before
            );
        }

        stats.runs_written = result.len();
        if stats.duplicate_positions > 0 {
            log::warn!(
                "{} duplicate positions found; each starts a new run",
                stats.duplicate_positions
            );
        }
        (result, stats)
    }

    /// Single-pass run detection for one chromosome.
    ///
    /// Rows must be sorted by position.
    fn merge_chromosome(
        &self,
        chrom: &str,
        rows: &[PositionRow],
        result: &mut Vec<MergedInterval>,
        stats: &mut RunMergeStats,
    ) {
        let Some(first) = rows.first() else {
            return;
        };

        let width = self.signal_columns.len();
        let mut run_start = first.position;
        let mut run_end = first.position;
        let mut run_len: u64 = 0;
        let mut means = vec![MeanAccumulator::default(); width];

        for (i, row) in rows.iter().enumerate() {
            let consecutive = i > 0 && run_end.checked_add(1) == Some(row.position);

            if i > 0 && !consecutive {
                if row.position == run_end {
                    stats.duplicate_positions += 1;
                }
                result.push(emit_run(chrom, run_start, run_end, &means));
                stats.longest_run = stats.longest_run.max(run_len);

                run_start = row.position;
                run_len = 0;
                means.iter_mut().for_each(|m| *m = MeanAccumulator::default());
            }

            run_end = row.position;
            run_len += 1;
            for (acc, &value) in means.iter_mut().zip(&row.values) {
                acc.push(value);
            }
        }

        result.push(emit_run(chrom, run_start, run_end, &means));
        stats.longest_run = stats.longest_run.max(run_len);
    }

    /// Run on a headered table file.
    pub fn run<P: AsRef<Path>, W: Write>(&self, input: P, output: &mut W) -> Result<RunMergeStats> {
        log::info!("Reading table: {}", input.as_ref().display());
        let source = TableSource::from_path(input)?;
        let rows = read_position_rows(
            &source,
            CHROM_COLUMN,
            POSITION_COLUMN,
            &self.signal_columns,
        )?;
        self.run_rows(rows, output)
    }

    /// Merge already-loaded rows and write the result.
    pub fn run_rows<W: Write>(
        &self,
        rows: Vec<PositionRow>,
        output: &mut W,
    ) -> Result<RunMergeStats> {
        let (merged, stats) = self.merge_with_stats(rows);

        let mut writer = TsvWriter::new(output, self.output.na_rep.as_str());
        if self.output.header {
            writer.write_header(self.header().as_slice())?;
        }
        for interval in &merged {
            writer.write_interval(interval)?;
        }
        writer.flush()?;

        log::debug!("Run merge stats: {}", stats);
        Ok(stats)
    }
}

fn emit_run(chrom: &str, start: u64, end: u64, means: &[MeanAccumulator]) -> MergedInterval {
    MergedInterval::new(chrom, start, end, means.iter().map(|m| m.finish()).collect())
}

/// Statistics from a run merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMergeStats {
    pub rows_read: usize,
    pub chromosomes: usize,
    pub runs_written: usize,
    pub longest_run: u64,
    pub duplicate_positions: usize,
}

impl RunMergeStats {
    pub fn compression_ratio(&self) -> f64 {
        if self.runs_written == 0 {
            0.0
        } else {
            self.rows_read as f64 / self.runs_written as f64
        }
    }
}

impl std::fmt::Display for RunMergeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rows: {}, Chroms: {}, Runs: {}, Longest run: {}, Compression: {:.2}x",
            self.rows_read,
            self.chromosomes,
            self.runs_written,
            self.longest_run,
            self.compression_ratio()
        )
    }
}
