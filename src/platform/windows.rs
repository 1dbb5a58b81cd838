//! Windows platform implementations.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

pub fn system_hosts_path() -> PathBuf {
    let root = std::env::var_os("SystemRoot").unwrap_or_else(|| r"C:\Windows".into());
    PathBuf::from(root)
        .join("System32")
        .join("drivers")
        .join("etc")
        .join("hosts")
}

/// The target cannot be renamed over while we hold it open, so the handle
/// always refers to the file at `path` once it exists.
pub fn same_file(_file: &File, path: &Path) -> io::Result<bool> {
    std::fs::metadata(path).map(|_| true)
}

/// New files inherit the directory ACL; nothing to adjust.
pub fn set_new_file_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
