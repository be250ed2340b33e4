//! End-to-end tests of the cnvmerge binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RUN_TABLE: &str = "\
Chr\tPosition\tDepth\tprop\tmean\tstd\texpDepth\tzscore\tcopynumber
1\t105\t30\t0.5\t31\t2\t33\t-1\t1.5
1\t100\t10\t0.25\t11\t1\t12\t0.5\t2
1\t101\t20\t0.5\t21\t1\t22\t1.5\t2
1\t102\t30\t0.75\t31\t1\t32\t\t2
1\t106\t40\t1.5\t41\t2\t43\tNA\t2.5
";

fn cnvmerge() -> Command {
    Command::cargo_bin("cnvmerge").unwrap()
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_runs_default_output() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.tsv", RUN_TABLE);
    let output = dir.path().join("out.tsv");

    cnvmerge()
        .arg("runs")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(
        read(&output),
        "Chr\tstart\tend\tDepth_mean\tprop_mean\tmean_mean\tstd_mean\texpDepth_mean\tzscore_mean\tcopynumber_mean\n\
         1\t100\t102\t20.0\t0.5\t21.0\t1.0\t22.0\t1.0\t2.0\n\
         1\t105\t106\t35.0\t1.0\t36.0\t2.0\t38.0\t-1.0\t2.0\n"
    );
}

#[test]
fn test_runs_no_header_and_columns() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.tsv", RUN_TABLE);
    let output = dir.path().join("out.tsv");

    cnvmerge()
        .args(["runs", "--no-header", "--na-rep", "NA", "-c", "zscore,Depth"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(read(&output), "1\t100\t102\t1.0\t20.0\n1\t105\t106\t-1.0\t35.0\n");
}

#[test]
fn test_runs_all_missing_column() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.tsv", "Chr\tPosition\tzscore\nX\t7\t\nX\t8\tNA\n");
    let output = dir.path().join("out.tsv");

    cnvmerge()
        .args(["runs", "-c", "zscore"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(read(&output), "Chr\tstart\tend\tzscore_mean\nX\t7\t8\t\n");
}

#[test]
fn test_runs_missing_column_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.tsv", "Chr\tPosition\tDepth\n1\t1\t2\n");
    let output = dir.path().join("out.tsv");

    cnvmerge()
        .arg("runs")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing required column 'prop'"));

    assert!(!output.exists());
}

#[test]
fn test_breakpoints_cli() {
    let dir = TempDir::new().unwrap();
    let table: String = (0..=10)
        .map(|i| format!("1\t{}\t{}\t2\tE\n", i * 10, i))
        .collect();
    let table = write(&dir, "temp.tsv", &table);
    let indices = write(&dir, "indices.txt", "3,7\n");
    let output = dir.path().join("out.tsv");

    cnvmerge()
        .arg("breakpoints")
        .arg("-t")
        .arg(&table)
        .arg("-i")
        .arg(&indices)
        .arg("-o")
        .arg(&output)
        .arg("--stats")
        .assert()
        .success()
        .stderr(predicate::str::contains("Written: 2"));

    assert_eq!(read(&output), "1\t0\t40\t2.0\t2.0\n1\t50\t80\t6.5\t2.0\n");
}

#[test]
fn test_breakpoints_long_flags() {
    let dir = TempDir::new().unwrap();
    let table = write(&dir, "temp.tsv", "1\t5\t\t\n");
    let indices = write(&dir, "indices.txt", "-1");
    let output = dir.path().join("out.tsv");

    cnvmerge()
        .arg("breakpoints")
        .arg("--temp_file")
        .arg(&table)
        .arg("--indices-file")
        .arg(&indices)
        .arg("--output_file")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(read(&output), "1\t5\t5\tNaN\tNaN\n");
}

#[test]
fn test_breakpoint_out_of_range_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let table = write(&dir, "temp.tsv", "1\t0\t1\t2\n1\t10\t1\t2\n");
    let indices = write(&dir, "indices.txt", "5");
    let output = dir.path().join("out.tsv");

    cnvmerge()
        .arg("breakpoints")
        .arg("-t")
        .arg(&table)
        .arg("-i")
        .arg(&indices)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("outside the table"));

    assert!(!output.exists());
    // no stray temporary files either
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.tsv");

    cnvmerge()
        .arg("runs")
        .arg("-i")
        .arg(dir.path().join("absent.tsv"))
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: I/O error"));
}
