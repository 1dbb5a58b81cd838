//! Platform specifics: default hosts file location and file identity.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
pub mod unix;

#[cfg(windows)]
pub mod windows;

/// Environment variable overriding the default hosts file path.
pub const HOSTS_FILE_ENV: &str = "HOSTS_FILE";

/// Default hosts file for this platform.
/// If HOSTS_FILE is set (e.g. in tests), that path wins.
pub fn default_hosts_path() -> PathBuf {
    if let Some(path) = std::env::var_os(HOSTS_FILE_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    #[cfg(unix)]
    return unix::system_hosts_path();

    #[cfg(windows)]
    return windows::system_hosts_path();
}

/// Whether the open handle still refers to the file at `path`.
pub fn same_file(file: &File, path: &Path) -> io::Result<bool> {
    #[cfg(unix)]
    return unix::same_file(file, path);

    #[cfg(windows)]
    return windows::same_file(file, path);
}

/// Give a newly created hosts file the usual world-readable mode.
pub fn set_new_file_permissions(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    return unix::set_new_file_permissions(path);

    #[cfg(windows)]
    return windows::set_new_file_permissions(path);
}
