//! Definitions: address plus hostnames, and the desired state.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HostsError, Result};

/// Desired presence of definitions in the hosts file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Present,
    Absent,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Present => f.write_str("present"),
            State::Absent => f.write_str("absent"),
        }
    }
}

/// IP address as found in the first column of a hosts line.
///
/// IPv6 link-local addresses may carry a zone (`fe80::1%eth0`). Equality is on
/// the parsed value, so `::1` and `0:0::1` name the same entry; the text it was
/// written with is kept for display.
#[derive(Debug, Clone)]
pub struct Address {
    ip: IpAddr,
    zone: Option<String>,
    text: String,
}

impl Address {
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.ip == other.ip && self.zone == other.zone
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ip.hash(state);
        self.zone.hash(state);
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        Self {
            ip,
            zone: None,
            text: ip.to_string(),
        }
    }
}

impl FromStr for Address {
    type Err = HostsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (addr, zone) = match s.split_once('%') {
            Some((addr, zone)) => (addr, Some(zone)),
            None => (s, None),
        };
        let ip: IpAddr = addr
            .parse()
            .map_err(|_| HostsError::invalid(format!("invalid address: {s:?}")))?;
        let zone = match zone {
            None => None,
            Some(z) if ip.is_ipv6() && is_zone(z) => Some(z.to_string()),
            Some(_) => return Err(HostsError::invalid(format!("invalid address zone: {s:?}"))),
        };
        Ok(Self {
            ip,
            zone,
            text: s.to_string(),
        })
    }
}

fn is_zone(z: &str) -> bool {
    !z.is_empty()
        && z
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Definition as supplied by the caller, before validation.
///
/// Both fields are optional here so a missing key surfaces as a validation
/// error naming the problem rather than a deserializer message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDefinition {
    #[serde(default)]
    pub ipaddress: Option<String>,
    #[serde(default)]
    pub hostnames: Option<Vec<String>>,
}

impl RawDefinition {
    /// Parse the command-line form `IP=NAME[,NAME...]`.
    pub fn parse_arg(arg: &str) -> Result<Self> {
        let (ip, names) = arg.split_once('=').ok_or_else(|| {
            HostsError::invalid(format!("expected IP=NAME[,NAME...], got {arg:?}"))
        })?;
        let ip = ip.trim();
        Ok(Self {
            ipaddress: (!ip.is_empty()).then(|| ip.to_string()),
            hostnames: Some(
                names
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(String::from)
                    .collect(),
            ),
        })
    }
}

/// Validated definition: one address and its hostnames (lower-cased, unique, in order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    address: Address,
    hostnames: Vec<String>,
}

impl Definition {
    /// Build a definition from an address string and hostnames.
    pub fn new<I, S>(ipaddress: &str, hostnames: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let address: Address = ipaddress.parse()?;
        let mut names: Vec<String> = Vec::new();
        for name in hostnames {
            let name = name.as_ref().trim();
            validate_hostname(name)?;
            let name = name.to_lowercase();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        if names.is_empty() {
            return Err(HostsError::invalid(format!(
                "no hostnames given for {address}"
            )));
        }
        Ok(Self {
            address,
            hostnames: names,
        })
    }

    /// Known-good names, used for built-in entries.
    pub(crate) fn from_parts(address: Address, hostnames: &[&str]) -> Self {
        Self {
            address,
            hostnames: hostnames.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Validate a caller-supplied definition.
    pub fn from_raw(raw: &RawDefinition) -> Result<Self> {
        let ipaddress = raw
            .ipaddress
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| HostsError::invalid("definition has no ipaddress"))?;
        let hostnames = raw
            .hostnames
            .as_ref()
            .ok_or_else(|| HostsError::invalid(format!("definition for {ipaddress} has no hostnames")))?;
        Self::new(ipaddress, hostnames)
    }

    /// Parse and validate the command-line form `IP=NAME[,NAME...]`.
    pub fn parse_arg(arg: &str) -> Result<Self> {
        Self::from_raw(&RawDefinition::parse_arg(arg)?)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn hostnames(&self) -> &[String] {
        &self.hostnames
    }
}

/// Validate every raw definition, failing on the first bad one.
pub fn validate_all(raw: &[RawDefinition]) -> Result<Vec<Definition>> {
    raw.iter().map(Definition::from_raw).collect()
}

/// Hostname must be a single hosts-file column.
pub fn validate_hostname(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(HostsError::invalid("empty hostname"));
    }
    if let Some(c) = name.chars().find(|c| c.is_whitespace() || *c == '#') {
        return Err(HostsError::invalid(format!(
            "invalid hostname {name:?}: illegal char {c:?}"
        )));
    }
    Ok(())
}
