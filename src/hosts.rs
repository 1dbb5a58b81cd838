//! Line model of a hosts file: parse, edit, render.
//!
//! Only lines touched by an edit are re-rendered; every other line (comments,
//! blank lines, entries for other addresses, lines we cannot parse) is written
//! back exactly as it was read, with its own line ending. The model works on
//! bytes so a stray Latin-1 comment does not make the file unreadable.

use tracing::{debug, warn};

use crate::definition::{Address, Definition, State};

/// Column width the address is padded to on rendered lines.
const ADDRESS_WIDTH: usize = 15;

/// Standard loopback/localhost entries seeded by `defaults`.
pub const DEFAULT_ENTRIES: &[(&str, &[&str])] = &[
    (
        "::1",
        &[
            "ip6-localhost",
            "ip6-loopback",
            "localhost",
            "localhost.localdomain",
            "localhost6",
            "localhost6.localdomain6",
        ],
    ),
    ("fe00::0", &["ip6-localnet", "ip6-mcastprefix"]),
    ("ff02::1", &["ip6-allnodes"]),
    ("ff02::2", &["ip6-allrouters"]),
    (
        "127.0.0.1",
        &[
            "localhost",
            "localhost.localdomain",
            "localhost4",
            "localhost4.localdomain4",
        ],
    ),
];

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    address: Address,
    names: Vec<String>,
    /// Bytes after `#`, without the `#`.
    comment: Option<Vec<u8>>,
    /// Original bytes. `None` once the entry has been edited or if it is new.
    raw: Option<Vec<u8>>,
}

impl Entry {
    fn render(&self, out: &mut Vec<u8>) {
        if let Some(raw) = &self.raw {
            out.extend_from_slice(raw);
            return;
        }
        let text = format!(
            "{:<width$} {}",
            self.address.to_string(),
            self.names.join(" "),
            width = ADDRESS_WIDTH
        );
        out.extend_from_slice(text.as_bytes());
        if let Some(comment) = &self.comment {
            out.extend_from_slice(b" #");
            out.extend_from_slice(comment);
        }
    }

    fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| same_name(n, name))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    /// Blank line, comment, or a line whose first column is not an address.
    Verbatim(Vec<u8>),
    Entry(Entry),
}

#[derive(Debug, Clone, PartialEq)]
struct Row {
    line: Line,
    /// `"\n"`, `"\r\n"`, or empty for a last line without one.
    ending: &'static str,
}

/// In-memory hosts file.
#[derive(Debug, Clone, PartialEq)]
pub struct HostsFile {
    rows: Vec<Row>,
    /// Ending used for lines we append: that of the first line, else `\n`.
    newline: &'static str,
}

impl Default for HostsFile {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            newline: "\n",
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn split_ending(piece: &[u8]) -> (&[u8], &'static str) {
    if let Some(text) = piece.strip_suffix(b"\r\n") {
        (text, "\r\n")
    } else if let Some(text) = piece.strip_suffix(b"\n") {
        (text, "\n")
    } else {
        (piece, "")
    }
}

fn parse_line(text: &[u8]) -> Line {
    let (data, comment) = match text.iter().position(|&b| b == b'#') {
        Some(i) => (&text[..i], Some(&text[i + 1..])),
        None => (text, None),
    };
    let Ok(data) = std::str::from_utf8(data) else {
        warn!(line = %String::from_utf8_lossy(text), "non-UTF-8 hosts line kept as-is");
        return Line::Verbatim(text.to_vec());
    };
    let mut cols = data.split_whitespace();
    let Some(first) = cols.next() else {
        return Line::Verbatim(text.to_vec());
    };
    match first.parse::<Address>() {
        Ok(address) => Line::Entry(Entry {
            address,
            names: cols.map(String::from).collect(),
            comment: comment.map(<[u8]>::to_vec),
            raw: Some(text.to_vec()),
        }),
        Err(_) => {
            warn!(line = %String::from_utf8_lossy(text), "unrecognised hosts line kept as-is");
            Line::Verbatim(text.to_vec())
        }
    }
}

impl HostsFile {
    /// Parse hosts file contents. Never fails: lines that are not
    /// `<address> <names...>` are kept verbatim.
    pub fn parse(contents: &str) -> Self {
        Self::parse_bytes(contents.as_bytes())
    }

    /// Parse raw file bytes. Lines whose address part is not UTF-8 are kept verbatim.
    pub fn parse_bytes(contents: &[u8]) -> Self {
        let rows: Vec<Row> = contents
            .split_inclusive(|&b| b == b'\n')
            .map(|piece| {
                let (text, ending) = split_ending(piece);
                Row {
                    line: parse_line(text),
                    ending,
                }
            })
            .collect();
        let newline = rows
            .first()
            .map(|r| r.ending)
            .filter(|e| !e.is_empty())
            .unwrap_or("\n");
        Self { rows, newline }
    }

    /// Render back to file bytes.
    pub fn render_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for row in &self.rows {
            match &row.line {
                Line::Verbatim(text) => out.extend_from_slice(text),
                Line::Entry(entry) => entry.render(&mut out),
            }
            out.extend_from_slice(row.ending.as_bytes());
        }
        out
    }

    /// Render back to text. Lossless for files that were valid UTF-8.
    pub fn render(&self) -> String {
        String::from_utf8_lossy(&self.render_bytes()).into_owned()
    }

    fn lines_mut(&mut self) -> impl Iterator<Item = &mut Line> {
        self.rows.iter_mut().map(|r| &mut r.line)
    }

    fn push(&mut self, entry: Entry) {
        let newline = self.newline;
        if let Some(last) = self.rows.last_mut() {
            if last.ending.is_empty() {
                last.ending = newline;
            }
        }
        self.rows.push(Row {
            line: Line::Entry(entry),
            ending: newline,
        });
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.rows.iter().filter_map(|r| match &r.line {
            Line::Entry(e) => Some(e),
            Line::Verbatim(_) => None,
        })
    }

    /// All hostnames listed for `address`, across every line for it.
    pub fn names_for(&self, address: &Address) -> Vec<&str> {
        self.entries()
            .filter(|e| &e.address == address)
            .flat_map(|e| e.names.iter().map(String::as_str))
            .collect()
    }

    /// Whether some line maps `address` to `name`.
    pub fn contains(&self, address: &Address, name: &str) -> bool {
        self.entries()
            .any(|e| &e.address == address && e.has_name(name))
    }

    /// Addresses in file order, each listed once.
    pub fn addresses(&self) -> Vec<&Address> {
        let mut out: Vec<&Address> = Vec::new();
        for e in self.entries() {
            if !out.contains(&&e.address) {
                out.push(&e.address);
            }
        }
        out
    }

    /// Apply one definition in the given state. Returns whether anything changed.
    pub fn apply(&mut self, definition: &Definition, state: State) -> bool {
        match state {
            State::Present => self.add(definition),
            State::Absent => self.remove(definition),
        }
    }

    /// Ensure every hostname of `definition` is mapped to its address.
    ///
    /// Missing names are appended to the first existing line for the address;
    /// if there is none, a new line is appended to the file.
    fn add(&mut self, definition: &Definition) -> bool {
        let address = definition.address();
        let missing: Vec<String> = definition
            .hostnames()
            .iter()
            .filter(|n| !self.contains(address, n))
            .cloned()
            .collect();
        if missing.is_empty() {
            return false;
        }
        for name in &missing {
            debug!(%address, name = name.as_str(), "add hostname");
        }

        let first = self.lines_mut().find_map(|l| match l {
            Line::Entry(e) if &e.address == address => Some(e),
            _ => None,
        });
        match first {
            Some(entry) => {
                entry.names.extend(missing);
                entry.raw = None;
            }
            None => self.push(Entry {
                address: address.clone(),
                names: missing,
                comment: None,
                raw: None,
            }),
        }
        true
    }

    /// Remove the hostnames of `definition` from every line for its address.
    /// Lines left without hostnames are dropped.
    fn remove(&mut self, definition: &Definition) -> bool {
        let address = definition.address();
        let mut changed = false;
        self.rows.retain_mut(|row| {
            let Line::Entry(entry) = &mut row.line else {
                return true;
            };
            if &entry.address != address {
                return true;
            }
            let before = entry.names.len();
            entry.names.retain(|n| {
                let hit = definition.hostnames().iter().any(|d| same_name(n, d));
                if hit {
                    debug!(%address, name = n.as_str(), "remove hostname");
                }
                !hit
            });
            if entry.names.len() == before {
                return true;
            }
            changed = true;
            entry.raw = None;
            if entry.names.is_empty() {
                debug!(%address, "remove empty line");
                return false;
            }
            true
        });
        changed
    }

    /// Seed the standard loopback entries. Returns whether anything changed.
    pub fn add_defaults(&mut self) -> bool {
        let mut changed = false;
        for definition in default_definitions() {
            changed |= self.add(&definition);
        }
        changed
    }
}

/// [`DEFAULT_ENTRIES`] as definitions.
pub fn default_definitions() -> Vec<Definition> {
    DEFAULT_ENTRIES
        .iter()
        .filter_map(|(address, names)| {
            let address: Address = address.parse().ok()?;
            Some(Definition::from_parts(address, names))
        })
        .collect()
}

/// Pure read-transform-write core over text: returns the new contents and
/// whether they differ.
pub fn transform(
    contents: &str,
    definitions: &[Definition],
    state: State,
    defaults: bool,
) -> (String, bool) {
    let (out, changed) = transform_bytes(contents.as_bytes(), definitions, state, defaults);
    (String::from_utf8_lossy(&out).into_owned(), changed)
}

/// Same as [`transform`], over the raw file bytes.
pub fn transform_bytes(
    contents: &[u8],
    definitions: &[Definition],
    state: State,
    defaults: bool,
) -> (Vec<u8>, bool) {
    let mut hosts = HostsFile::parse_bytes(contents);
    if defaults {
        hosts.add_defaults();
    }
    for definition in definitions {
        hosts.apply(definition, state);
    }
    let rendered = hosts.render_bytes();
    let changed = rendered != contents;
    (rendered, changed)
}
