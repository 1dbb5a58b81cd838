//! Error type for hosts file operations.

use std::io;
use std::path::PathBuf;

/// Errors surfaced by the editor and its inputs.
#[derive(Debug, thiserror::Error)]
pub enum HostsError {
    /// Target file missing, unreadable, unwritable, or could not be locked.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A definition is malformed. Raised before the file is touched.
    #[error("invalid definition: {0}")]
    Validation(String),

    /// Parameters file could not be read or parsed.
    #[error("cannot load parameters from {}: {message}", path.display())]
    Params { path: PathBuf, message: String },
}

impl HostsError {
    pub(crate) fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HostsError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        HostsError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, HostsError>;
