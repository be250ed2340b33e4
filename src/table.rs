//! Tab-separated table loading and row parsing.
//!
//! Both pipelines load their whole input into memory. Small files are read
//! into a buffer, large ones are memory-mapped.

use crate::value::Value;
use memchr::memchr;
use memmap2::Mmap;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{self, Read};
use std::ops::Deref;
use std::path::Path;
use thiserror::Error;

/// Files at or above this size are memory-mapped instead of read.
const MMAP_THRESHOLD: u64 = 64 * 1024 * 1024;

/// Errors that can occur while reading, merging or writing tables.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Missing required column '{0}' in header")]
    MissingColumn(String),

    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    #[error("Invalid breakpoint index: '{token}'")]
    InvalidBreakpoint { token: String },

    #[error(
        "Breakpoint {breakpoint} resolves to row {offset}, outside the table ({rows} rows)"
    )]
    BreakpointOutOfRange {
        breakpoint: i64,
        offset: i64,
        rows: usize,
    },
}

pub type Result<T> = std::result::Result<T, TableError>;

/// In-memory contents of an input file.
pub enum TableSource {
    Buffer(Vec<u8>),
    Mapped(Mmap),
}

impl TableSource {
    /// Load a file, memory-mapping it when it is large.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let size = file.metadata()?.len();

        if size >= MMAP_THRESHOLD {
            // The mapping is only read, and inputs are not expected to change mid-run.
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(TableSource::Mapped(mmap))
        } else {
            Self::from_reader(file)
        }
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(TableSource::Buffer(buf))
    }
}

impl Deref for TableSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            TableSource::Buffer(buf) => buf,
            TableSource::Mapped(mmap) => mmap,
        }
    }
}

/// Iterator over the non-blank lines of a table, with 1-based line numbers.
pub struct TsvLines<'a> {
    data: &'a [u8],
    pos: usize,
    line_number: usize,
}

impl<'a> TsvLines<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line_number: 0,
        }
    }
}

impl<'a> Iterator for TsvLines<'a> {
    type Item = Result<(usize, &'a str)>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.data.len() {
            let rest = &self.data[self.pos..];
            let (mut line, advance) = match memchr(b'\n', rest) {
                Some(nl) => (&rest[..nl], nl + 1),
                None => (rest, rest.len()),
            };
            self.pos += advance;
            self.line_number += 1;

            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            // A tab-only line is a row of empty fields, not a blank line.
            if line.iter().all(|&b| b != b'\t' && b.is_ascii_whitespace()) {
                continue;
            }

            let line_number = self.line_number;
            return Some(match std::str::from_utf8(line) {
                Ok(s) => Ok((line_number, s)),
                Err(_) => Err(TableError::Parse {
                    line: line_number,
                    message: "Line is not valid UTF-8".to_string(),
                }),
            });
        }
        None
    }
}

/// Parse an unsigned integer position field.
pub fn parse_position(field: &str, line: usize, name: &str) -> Result<u64> {
    field.trim().parse().map_err(|_| TableError::Parse {
        line,
        message: format!("Invalid {} position: '{}'", name, field),
    })
}

/// Parse a numeric field, treating empty fields and NA tokens as missing.
pub fn parse_value(field: &str, line: usize, name: &str) -> Result<Value> {
    Value::parse(field).ok_or_else(|| TableError::Parse {
        line,
        message: format!("Invalid numeric value in column {}: '{}'", name, field),
    })
}

/// A row of the headerless breakpoint-merge input:
/// `chr  start  z_score  CN  [extra...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointRow {
    pub chrom: String,
    pub start: u64,
    pub value_a: Value,
    pub value_b: Value,
}

/// Read every row of a headerless breakpoint-merge table, in file order.
pub fn read_breakpoint_rows(data: &[u8]) -> Result<Vec<BreakpointRow>> {
    let mut rows = Vec::new();

    for line in TsvLines::new(data) {
        let (line_number, line) = line?;
        let mut fields = line.split('\t');

        let chrom = fields.next().unwrap_or_default();
        let start = fields.next().ok_or_else(|| TableError::Parse {
            line: line_number,
            message: "Expected at least 2 fields (chr, start), got 1".to_string(),
        })?;
        let start = parse_position(start, line_number, "start")?;

        // Absent value columns are read as missing.
        let value_a = match fields.next() {
            Some(f) => parse_value(f, line_number, "3")?,
            None => Value::Missing,
        };
        let value_b = match fields.next() {
            Some(f) => parse_value(f, line_number, "4")?,
            None => Value::Missing,
        };

        rows.push(BreakpointRow {
            chrom: chrom.to_string(),
            start,
            value_a,
            value_b,
        });
    }

    Ok(rows)
}

/// A row of the headered position table, holding only the columns used.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRow {
    pub chrom: String,
    pub position: u64,
    /// Signal values, in the order of the requested columns.
    pub values: Vec<Value>,
}

/// Column layout resolved from a header line.
#[derive(Debug, Clone)]
struct PositionLayout {
    chrom: usize,
    position: usize,
    signals: Vec<usize>,
    width: usize,
}

impl PositionLayout {
    fn from_header(header: &str, chrom: &str, position: &str, signals: &[String]) -> Result<Self> {
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, name) in header.split('\t').enumerate() {
            // first occurrence wins on duplicate names
            index.entry(name.trim()).or_insert(i);
        }

        let find = |name: &str| -> Result<usize> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| TableError::MissingColumn(name.to_string()))
        };

        let chrom = find(chrom)?;
        let position = find(position)?;
        let signals = signals
            .iter()
            .map(|s| find(s))
            .collect::<Result<Vec<_>>>()?;
        let width = signals
            .iter()
            .copied()
            .chain([chrom, position])
            .max()
            .map_or(0, |m| m + 1);

        Ok(Self {
            chrom,
            position,
            signals,
            width,
        })
    }
}

/// Read a headered position table.
///
/// `chrom_column` and `position_column` name the key columns, `signal_columns`
/// the numeric columns to keep. Any other column is ignored.
pub fn read_position_rows(
    data: &[u8],
    chrom_column: &str,
    position_column: &str,
    signal_columns: &[String],
) -> Result<Vec<PositionRow>> {
    let mut lines = TsvLines::new(data);

    let (_, header) = lines
        .next()
        .ok_or_else(|| TableError::InvalidFormat("Input has no header line".to_string()))??;
    let layout = PositionLayout::from_header(header, chrom_column, position_column, signal_columns)?;

    let mut rows = Vec::new();
    let mut fields: Vec<&str> = Vec::with_capacity(layout.width);

    for line in lines {
        let (line_number, line) = line?;
        fields.clear();
        fields.extend(line.split('\t'));

        if fields.len() < layout.width {
            return Err(TableError::Parse {
                line: line_number,
                message: format!(
                    "Expected at least {} fields, got {}",
                    layout.width,
                    fields.len()
                ),
            });
        }

        let chrom = fields[layout.chrom].trim();
        if chrom.is_empty() {
            return Err(TableError::Parse {
                line: line_number,
                message: format!("Empty {} field", chrom_column),
            });
        }
        let position = parse_position(fields[layout.position], line_number, position_column)?;
        let values = layout
            .signals
            .iter()
            .zip(signal_columns)
            .map(|(&i, name)| parse_value(fields[i], line_number, name))
            .collect::<Result<Vec<_>>>()?;

        rows.push(PositionRow {
            chrom: chrom.to_string(),
            position,
            values,
        });
    }

    Ok(rows)
}
