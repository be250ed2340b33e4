//! Breakpoint index lists for the index-gap merger.

use crate::table::{Result, TableError};
use std::fs;
use std::path::Path;

/// Sentinel prepended to every breakpoint list so the first interval starts
/// at row 0 (`SENTINEL + 2 == 0`).
pub const SENTINEL: i64 = -2;

/// Ordered breakpoint row offsets, sentinel first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointList {
    indices: Vec<i64>,
}

impl BreakpointList {
    /// Build a list from user breakpoints, prepending the sentinel.
    pub fn new(breakpoints: impl IntoIterator<Item = i64>) -> Self {
        let mut indices = vec![SENTINEL];
        indices.extend(breakpoints);
        Self { indices }
    }

    /// Parse a comma-separated list such as `"3,7"`.
    ///
    /// Whitespace around the whole list and around each token is ignored.
    /// An empty token is an error, so an empty file is rejected.
    pub fn parse(content: &str) -> Result<Self> {
        let breakpoints = content
            .trim()
            .split(',')
            .map(|token| {
                let token = token.trim();
                token.parse::<i64>().map_err(|_| TableError::InvalidBreakpoint {
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(breakpoints))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Number of user breakpoints, excluding the sentinel.
    pub fn len(&self) -> usize {
        self.indices.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All indices including the leading sentinel.
    pub fn indices(&self) -> &[i64] {
        &self.indices
    }

    /// Adjacent `(previous, current)` pairs, one per user breakpoint.
    pub fn pairs(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.indices.windows(2).map(|w| (w[0], w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prepends_sentinel() {
        let list = BreakpointList::parse("3,7\n").unwrap();

        assert_eq!(list.indices(), &[-2, 3, 7]);
        assert_eq!(list.len(), 2);
        assert!(!list.is_empty());
        assert_eq!(list.pairs().collect::<Vec<_>>(), vec![(-2, 3), (3, 7)]);
    }

    #[test]
    fn test_sentinel_only_list_is_empty() {
        let list = BreakpointList::new(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.pairs().count(), 0);
    }

    #[test]
    fn test_parse_tolerates_spaces() {
        let list = BreakpointList::parse(" 1, 4 ,9 ").unwrap();
        assert_eq!(list.indices(), &[-2, 1, 4, 9]);
    }

    #[test]
    fn test_parse_empty_is_error() {
        let err = BreakpointList::parse("\n").unwrap_err();
        assert!(matches!(err, TableError::InvalidBreakpoint { ref token } if token.is_empty()));
    }

    #[test]
    fn test_parse_trailing_comma_is_error() {
        assert!(BreakpointList::parse("3,7,").is_err());
    }

    #[test]
    fn test_parse_non_integer() {
        let err = BreakpointList::parse("3,x").unwrap_err();
        assert!(matches!(err, TableError::InvalidBreakpoint { ref token } if token == "x"));
    }
}
