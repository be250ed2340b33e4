//! Regression tests for the breakpoint merge offsets.
//!
//! The expected outputs below were produced by the legacy pandas script on
//! the same inputs. The `+1`/`+2` offsets are pinned by these files: any
//! change to the range arithmetic shows up here first.

use cnv_merge::commands::BreakpointMergeCommand;
use cnv_merge::table::TableError;
use std::io::Write;
use tempfile::NamedTempFile;

const TABLE: &str = "\
chr1\t0\t0.5\t2\tA
chr1\t1000\t1.5\t2\tA
chr1\t2000\tNA\t3\tA
chr1\t3000\t-0.5\t3\tA
chr1\t4000\t\t\tA
chr1\t5000\t1\t4\tA
chr2\t6000\t2\t4\tA
chr2\t7000\t\t\tA
chr2\t8000\t\t\tA
chr2\t9000\t3\t1\tA
";

const LEGACY_OUTPUT: &str = "\
chr1\t0\t3000\t0.5\t2.5
chr2\t4000\t6000\t1.5\t4.0
chr2\t7000\t8000\tNaN\tNaN
";

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_legacy_output_matches() {
    let table = write_temp(TABLE);
    let indices = write_temp("2,5,7\n");
    let mut output = Vec::new();

    let stats = BreakpointMergeCommand::new()
        .run(table.path(), indices.path(), &mut output)
        .unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), LEGACY_OUTPUT);
    assert_eq!(stats.rows_read, 10);
    assert_eq!(stats.breakpoints_read, 3);
    assert_eq!(stats.intervals_written, 3);
    assert_eq!(stats.missing_z_score, 1);
    assert_eq!(stats.missing_cn, 1);
}

/// Eleven rows with starts 0, 10, ..., 100 and breakpoints "3,7".
#[test]
fn test_ten_step_table() {
    let table: String = (0..=10)
        .map(|i| format!("1\t{}\t{}\t{}\tE\n", i * 10, i, 10 - i))
        .collect();
    let table = write_temp(&table);
    let indices = write_temp("3,7");
    let mut output = Vec::new();

    BreakpointMergeCommand::new()
        .run(table.path(), indices.path(), &mut output)
        .unwrap();

    // (-2, 3) -> rows 0..=4, (3, 7) -> rows 5..=8
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "1\t0\t40\t2.0\t8.0\n1\t50\t80\t6.5\t3.5\n"
    );
}

#[test]
fn test_output_rows_equal_breakpoints() {
    let table: String = (0..100).map(|i| format!("1\t{}\t1\t2\n", i)).collect();
    let table = write_temp(&table);

    for list in ["0", "0,1", "5,10,20,40,80", "97"] {
        let indices = write_temp(list);
        let mut output = Vec::new();

        let stats = BreakpointMergeCommand::new()
            .run(table.path(), indices.path(), &mut output)
            .unwrap();

        let expected = list.split(',').count();
        assert_eq!(stats.intervals_written, expected, "breakpoints: {}", list);
        assert_eq!(
            String::from_utf8(output).unwrap().lines().count(),
            expected
        );
    }
}

#[test]
fn test_last_breakpoint_past_table() {
    let table = write_temp(TABLE);
    // 9 + 1 = 10, one past the last row
    let indices = write_temp("2,9");
    let mut output = Vec::new();

    let err = BreakpointMergeCommand::new()
        .run(table.path(), indices.path(), &mut output)
        .unwrap_err();

    assert!(matches!(
        err,
        TableError::BreakpointOutOfRange {
            breakpoint: 9,
            offset: 10,
            rows: 10
        }
    ));
    assert!(output.is_empty());
}

#[test]
fn test_missing_table_file() {
    let indices = write_temp("1");
    let mut output = Vec::new();

    let err = BreakpointMergeCommand::new()
        .run("/nonexistent/table.tsv", indices.path(), &mut output)
        .unwrap_err();

    assert!(matches!(err, TableError::Io(_)));
}
