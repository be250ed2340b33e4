//! Tab-separated output for merged intervals.
//!
//! Uses itoa for integer formatting and ryu for float formatting.

use crate::interval::MergedInterval;
use crate::table::{Result, TableError};
use crate::value::Value;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Buffer size for TsvWriter (256KB).
const BUF_SIZE: usize = 256 * 1024;

/// Buffered writer for merged interval tables.
pub struct TsvWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    ryu_buf: ryu::Buffer,
    na_rep: String,
}

impl<W: Write> TsvWriter<W> {
    /// Create a writer that prints missing values as `na_rep`.
    pub fn new(output: W, na_rep: impl Into<String>) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUF_SIZE, output),
            itoa_buf: itoa::Buffer::new(),
            ryu_buf: ryu::Buffer::new(),
            na_rep: na_rep.into(),
        }
    }

    /// Write a header line from column names.
    pub fn write_header<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<()> {
        for (i, name) in columns.iter().enumerate() {
            if i > 0 {
                self.writer.write_all(b"\t")?;
            }
            self.writer.write_all(name.as_ref().as_bytes())?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write `chrom  start  end  value...` followed by a newline.
    #[inline]
    pub fn write_interval(&mut self, interval: &MergedInterval) -> Result<()> {
        self.writer.write_all(interval.chrom.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(interval.start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(interval.end).as_bytes())?;
        for &value in &interval.values {
            self.writer.write_all(b"\t")?;
            self.write_value(value)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write a single value, using the missing token when absent.
    #[inline]
    pub fn write_value(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Present(v) => self.writer.write_all(self.ryu_buf.format(v).as_bytes())?,
            Value::Missing => self.writer.write_all(self.na_rep.as_bytes())?,
        }
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| TableError::Io(e.into_error()))
    }
}

/// Output file that only appears at its destination once committed.
///
/// Data goes to a temporary file in the destination directory, which is
/// renamed over the destination by [`AtomicOutput::commit`]. Dropping an
/// uncommitted output removes the temporary file.
pub struct AtomicOutput {
    file: NamedTempFile,
    dest: PathBuf,
}

impl AtomicOutput {
    pub fn create<P: AsRef<Path>>(dest: P) -> Result<Self> {
        let dest = dest.as_ref().to_path_buf();
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file = NamedTempFile::new_in(dir)?;
        Ok(Self { file, dest })
    }

    pub fn file_mut(&mut self) -> &mut NamedTempFile {
        &mut self.file
    }

    /// Move the finished file into place.
    pub fn commit(self) -> Result<()> {
        self.file.persist(&self.dest).map_err(|e| e.error)?;
        Ok(())
    }
}
