//! Invocation parameters and parameters-file loading.
//!
//! A parameters file is TOML using the same names as the command-line flags:
//!
//! ```toml
//! hostsfile = "/etc/hosts"
//! state = "present"
//! defaults = false
//!
//! [[definitions]]
//! ipaddress = "172.0.0.100"
//! hostnames = ["pietje", "lala", "lala.lala"]
//! ```

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::definition::{self, Definition, RawDefinition, State};
use crate::editor::{HostsFileEditor, Outcome};
use crate::error::{HostsError, Result};
use crate::platform;

/// One invocation's parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    /// Target file. Falls back to HOSTS_FILE, then the platform default.
    #[serde(default)]
    pub hostsfile: Option<PathBuf>,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub definitions: Vec<RawDefinition>,
    /// Seed the standard loopback entries.
    #[serde(default)]
    pub defaults: bool,
    /// Append diagnostic log lines to this file.
    #[serde(default)]
    pub debuglog: Option<PathBuf>,
    #[serde(default)]
    pub check_mode: bool,
    #[serde(default)]
    pub create: bool,
}

impl Params {
    /// Load parameters from a TOML file (with shared lock).
    pub fn load(path: &Path) -> Result<Params> {
        let err = |message: String| HostsError::Params {
            path: path.to_path_buf(),
            message,
        };
        let mut file = fs::OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|e| err(e.to_string()))?;
        fs2::FileExt::lock_shared(&file).map_err(|e| err(e.to_string()))?;
        let mut s = String::new();
        file.read_to_string(&mut s).map_err(|e| err(e.to_string()))?;
        toml::from_str(&s).map_err(|e| err(e.to_string()))
    }

    /// Resolved target path.
    pub fn hostsfile(&self) -> PathBuf {
        self.hostsfile
            .clone()
            .unwrap_or_else(platform::default_hosts_path)
    }

    /// Validate all definitions.
    pub fn definitions(&self) -> Result<Vec<Definition>> {
        definition::validate_all(&self.definitions)
    }

    pub fn editor(&self) -> HostsFileEditor {
        HostsFileEditor::new(self.hostsfile())
            .defaults(self.defaults)
            .check_mode(self.check_mode)
            .create(self.create)
    }

    /// Validate, then edit. Nothing on disk is touched if validation fails.
    pub fn run(&self) -> Result<Outcome> {
        let definitions = self.definitions()?;
        self.editor().run(&definitions, self.state)
    }
}
