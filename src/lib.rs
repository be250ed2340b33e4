//! cnv-merge: interval merging for copy-number analysis tables.
//!
//! Two merges are provided:
//!
//! - **Breakpoint merge**: rows of a headerless table are collapsed between
//!   consecutive breakpoint indices, averaging the z-score and copy-number
//!   columns.
//! - **Run merge**: rows of a headered per-position table are collapsed into
//!   maximal runs of consecutive positions per chromosome, averaging every
//!   signal column.
//!
//! Missing values are skipped when averaging. A column with no values in a
//! group yields [`Value::Missing`] rather than zero or an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use cnv_merge::commands::RunMergeCommand;
//!
//! let cmd = RunMergeCommand::new();
//! let mut out = Vec::new();
//! let stats = cmd.run("coverage.tsv", &mut out).unwrap();
//! println!("{}", stats);
//! ```

pub mod breakpoints;
pub mod commands;
pub mod config;
pub mod interval;
pub mod output;
pub mod table;
pub mod value;

// Re-export commonly used types
pub use breakpoints::BreakpointList;
pub use interval::MergedInterval;
pub use table::{Result, TableError};
pub use value::Value;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::breakpoints::BreakpointList;
    pub use crate::commands::{BreakpointMergeCommand, RunMergeCommand};
    pub use crate::config::OutputOptions;
    pub use crate::interval::MergedInterval;
    pub use crate::table::{Result, TableError};
    pub use crate::value::Value;
}
