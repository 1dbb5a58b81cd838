//! Tracing subscriber setup.
//!
//! Without a debug log, events go to stderr filtered by `RUST_LOG` (default
//! `warn`). With one, everything from `debug` up is appended to that file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::{HostsError, Result};

/// Install the global subscriber. A second call is a no-op.
pub fn init(debuglog: Option<&Path>) -> Result<()> {
    match debuglog {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| HostsError::access(path, e))?;
            let _ = tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_max_level(Level::DEBUG)
                .try_init();
        }
        None => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            let _ = tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .with_target(false)
                .try_init();
        }
    }
    Ok(())
}
