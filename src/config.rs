//! Output configuration shared by the merge commands.
//!
//! Commands receive an [`OutputOptions`] value instead of reading process-wide
//! state, so two merges with different settings can run side by side.

/// Missing-value token written by the breakpoint merger.
pub const NAN_TOKEN: &str = "NaN";

/// Default signal columns averaged by the run merger.
pub const DEFAULT_SIGNAL_COLUMNS: [&str; 7] = [
    "Depth",
    "prop",
    "mean",
    "std",
    "expDepth",
    "zscore",
    "copynumber",
];

/// Default signal column list as owned strings.
pub fn default_signal_columns() -> Vec<String> {
    DEFAULT_SIGNAL_COLUMNS.iter().map(|s| s.to_string()).collect()
}

/// How a merged table is serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Write a header line before the first record.
    pub header: bool,
    /// Token written in place of a missing average.
    pub na_rep: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            header: true,
            na_rep: String::new(),
        }
    }
}

impl OutputOptions {
    /// Headerless output with `NaN` for missing averages.
    pub fn headerless_nan() -> Self {
        Self {
            header: false,
            na_rep: NAN_TOKEN.to_string(),
        }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn with_na_rep(mut self, na_rep: impl Into<String>) -> Self {
        self.na_rep = na_rep.into();
        self
    }
}
