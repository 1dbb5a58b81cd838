//! HostsFileEditor: locked read-modify-write of a hosts file on disk.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::definition::{Definition, State};
use crate::error::{HostsError, Result};
use crate::hosts;
use crate::platform;

/// Result document returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Whether the file content changed (or would have, in check mode).
    pub changed: bool,
    /// Path operated on.
    pub hostsfile: PathBuf,
}

/// Applies definitions to one hosts file.
#[derive(Debug, Clone)]
pub struct HostsFileEditor {
    path: PathBuf,
    defaults: bool,
    check_mode: bool,
    create: bool,
}

impl HostsFileEditor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            defaults: false,
            check_mode: false,
            create: false,
        }
    }

    /// Seed the standard loopback entries before applying definitions.
    pub fn defaults(mut self, defaults: bool) -> Self {
        self.defaults = defaults;
        self
    }

    /// Compute the outcome without writing.
    pub fn check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    /// Treat a missing file as empty and create it on write.
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Apply `definitions` in `state`, holding an exclusive lock on the file
    /// for the whole read-modify-write cycle.
    pub fn run(&self, definitions: &[Definition], state: State) -> Result<Outcome> {
        info!(
            path = %self.path.display(),
            %state,
            definitions = definitions.len(),
            defaults = self.defaults,
            check_mode = self.check_mode,
            "editing hosts file"
        );

        loop {
            let (handle, contents) = self.read_locked()?;
            let (updated, changed) =
                hosts::transform_bytes(&contents, definitions, state, self.defaults);

            if changed && !self.check_mode {
                match self.write(handle.as_ref(), &updated) {
                    Ok(()) => info!(path = %self.path.display(), "hosts file written"),
                    Err(HostsError::FileAccess { source, .. })
                        if handle.is_none() && source.kind() == io::ErrorKind::AlreadyExists =>
                    {
                        debug!("hosts file created concurrently, retrying");
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            } else {
                debug!(changed, "hosts file not written");
            }
            drop(handle);

            return Ok(Outcome {
                changed,
                hostsfile: self.path.clone(),
            });
        }
    }

    /// Open and lock the target, returning the locked handle and its bytes.
    /// A missing file reads as empty (no handle) when `create` is set; it is
    /// only created if there is something to write.
    ///
    /// The file is replaced by rename on write, so a waiter may end up holding
    /// a lock on a file that is no longer at `path`. In that case it retries.
    fn read_locked(&self) -> Result<(Option<File>, Vec<u8>)> {
        loop {
            let mut file = match OpenOptions::new()
                .read(true)
                .write(!self.check_mode)
                .open(&self.path)
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::NotFound && self.create => {
                    debug!("hosts file missing, treating as empty");
                    return Ok((None, Vec::new()));
                }
                Err(e) => return Err(HostsError::access(&self.path, e)),
            };

            fs2::FileExt::lock_exclusive(&file).map_err(|e| HostsError::access(&self.path, e))?;

            match platform::same_file(&file, &self.path) {
                Ok(true) => {}
                Ok(false) => {
                    debug!("hosts file replaced while waiting for lock, retrying");
                    continue;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound && self.create => continue,
                Err(e) => return Err(HostsError::access(&self.path, e)),
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .map_err(|e| HostsError::access(&self.path, e))?;
            return Ok((Some(file), contents));
        }
    }

    /// Write `contents` to a temp file next to the target and rename it over
    /// the target. If the rename is refused (e.g. a bind-mounted file), fall
    /// back to rewriting through the locked handle.
    ///
    /// Without a handle the target did not exist; the rename then refuses to
    /// replace a file someone else created in the meantime.
    fn write(&self, handle: Option<&File>, contents: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::Builder::new()
            .prefix(".hosts-file")
            .tempfile_in(&dir)
            .map_err(|e| HostsError::access(&dir, e))?;
        tmp.write_all(contents)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| HostsError::access(tmp.path(), e))?;

        let Some(file) = handle else {
            platform::set_new_file_permissions(tmp.path())
                .map_err(|e| HostsError::access(tmp.path(), e))?;
            return tmp
                .persist_noclobber(&self.path)
                .map(drop)
                .map_err(|e| HostsError::access(&self.path, e.error));
        };

        let perms = file
            .metadata()
            .map_err(|e| HostsError::access(&self.path, e))?
            .permissions();
        fs::set_permissions(tmp.path(), perms).map_err(|e| HostsError::access(tmp.path(), e))?;

        match tmp.persist(&self.path) {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(error = %e.error, "rename over hosts file failed, rewriting in place");
                rewrite_in_place(file, contents).map_err(|e| HostsError::access(&self.path, e))
            }
        }
    }
}

fn rewrite_in_place(mut file: &File, contents: &[u8]) -> io::Result<()> {
    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    file.write_all(contents)?;
    file.sync_all()
}
