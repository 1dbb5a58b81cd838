//! Shared test helpers.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temp directory to hold a scratch hosts file.
/// Uses current dir (workspace) so sandbox allows full access.
pub fn temp_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("hostsfile_test_")
        .tempdir_in(std::env::current_dir().unwrap_or_else(|_| std::path::Path::new(".").into()))
        .expect("temp dir")
}

/// Write `contents` to `<dir>/hosts` and return its path.
pub fn hosts_with(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("hosts");
    fs::write(&path, contents).unwrap();
    path
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

/// A line as the editor renders it.
pub fn line(ip: &str, names: &str) -> String {
    format!("{ip:<15} {names}")
}
