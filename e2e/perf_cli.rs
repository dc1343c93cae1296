// e2e/perf_cli.rs: lz4-decompress-perf as a black box
//
// Runs the binary with std::process::Command and checks exit codes and the
// summary it prints.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

fn perf_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lz4-decompress-perf"))
}

fn make_temp_input(size: usize) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("column.bin");
    fs::write(&path, lz4_adaptive::sample::generate(size, 9)).unwrap();
    (dir, path)
}

// ── 1. File input ────────────────────────────────────────────────────────────

#[test]
fn test_file_input_reports_variants() {
    let (_dir, input) = make_temp_input(512 * 1024);
    let out = Command::new(perf_bin())
        .arg(&input)
        .args(["-b", "64K", "-i", "4", "-T", "2"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("8 blocks"), "{stdout}");
    assert!(stdout.contains("2 threads"), "{stdout}");
    for variant in 0..3 {
        assert!(stdout.contains(&format!("variant {variant}")), "{stdout}");
    }
}

// ── 2. Generated input, fixed method ─────────────────────────────────────────

#[test]
fn test_generated_input_fixed_method() {
    let out = Command::new(perf_bin())
        .args(["--sample-size", "1M", "-b", "256K", "-i", "3", "-m", "2", "-T", "1"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    // 4 blocks x 3 iterations, all on variant 2.
    let line = stdout.lines().find(|l| l.contains("variant 2")).unwrap();
    assert!(line.contains(" 12 selected"), "{line}");
}

// ── 3. Environment override ──────────────────────────────────────────────────

#[test]
fn test_environment_selects_method() {
    let out = Command::new(perf_bin())
        .env("LZ4_DECOMPRESS_METHOD", "0")
        .args(["--sample-size", "512K", "-b", "128K", "-i", "2", "-T", "1"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let line = stdout.lines().find(|l| l.contains("variant 0")).unwrap();
    assert!(line.contains(" 8 selected"), "{line}");
}

// ── 4. Errors ────────────────────────────────────────────────────────────────

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let out = Command::new(perf_bin()).arg(dir.path().join("absent.bin")).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot read input file"));
}

#[test]
fn test_bad_method_is_usage_error() {
    let out = Command::new(perf_bin()).args(["-m", "fastest"]).output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn test_zero_block_size_fails() {
    let out = Command::new(perf_bin()).args(["--sample-size", "1K", "-b", "0"]).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("block-size"));
}

#[test]
fn test_quiet_prints_nothing() {
    let out = Command::new(perf_bin())
        .args(["--sample-size", "64K", "-b", "64K", "-i", "1", "-q", "-q"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}
