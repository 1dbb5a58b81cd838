//! hosts-file - declarative add/remove of hosts file entries.

pub mod cli;
pub mod definition;
pub mod editor;
pub mod error;
pub mod hosts;
pub mod logging;
pub mod params;
pub mod platform;

pub use definition::{Address, Definition, RawDefinition, State};
pub use editor::{HostsFileEditor, Outcome};
pub use error::HostsError;
pub use hosts::HostsFile;
pub use params::Params;
