//! Merge command implementations.

pub mod breakpoint_merge;
pub mod run_merge;

pub use breakpoint_merge::{BreakpointMergeCommand, BreakpointMergeStats};
pub use run_merge::{ChromOrder, RunMergeCommand, RunMergeStats};
