//! CLI definition and entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::definition::{RawDefinition, State};
use crate::logging;
use crate::params::Params;

#[derive(Parser)]
#[command(name = "hosts-file")]
#[command(about = "Add or remove IP-to-hostname entries in a hosts file")]
pub struct Cli {
    /// Hosts file to edit [default: $HOSTS_FILE, else the system hosts file]
    #[arg(long, value_name = "PATH")]
    pub hostsfile: Option<PathBuf>,

    /// Whether the definitions should be present or absent [default: present]
    #[arg(long, value_enum)]
    pub state: Option<State>,

    /// Definition as IP=NAME[,NAME...]; may be repeated
    #[arg(short = 'd', long = "definition", value_name = "IP=NAMES")]
    pub definitions: Vec<String>,

    /// TOML file with parameters; flags given here override it
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Also add the standard localhost/loopback entries
    #[arg(long)]
    pub defaults: bool,

    /// Append diagnostic log lines to this file
    #[arg(long, value_name = "PATH")]
    pub debuglog: Option<PathBuf>,

    /// Report whether the file would change, without writing it
    #[arg(long)]
    pub check: bool,

    /// Create the hosts file if it does not exist
    #[arg(long)]
    pub create: bool,
}

impl Cli {
    /// Merge flags over the parameters file (if any).
    pub fn into_params(self) -> Result<Params> {
        let mut params = match &self.params {
            Some(path) => Params::load(path)?,
            None => Params::default(),
        };
        if let Some(path) = self.hostsfile {
            params.hostsfile = Some(path);
        }
        if let Some(state) = self.state {
            params.state = state;
        }
        for arg in &self.definitions {
            params.definitions.push(RawDefinition::parse_arg(arg)?);
        }
        params.defaults |= self.defaults;
        if let Some(path) = self.debuglog {
            params.debuglog = Some(path);
        }
        params.check_mode |= self.check;
        params.create |= self.create;
        Ok(params)
    }
}

/// Parse arguments, edit the hosts file, print the result as JSON.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let params = cli.into_params()?;
    logging::init(params.debuglog.as_deref())?;

    let outcome = params.run()?;
    println!("{}", serde_json::to_string(&outcome)?);
    Ok(())
}
