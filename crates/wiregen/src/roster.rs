//! CSV roster of hosts to provision.
//!
//! The first line is a header; columns are looked up by name, so their order
//! and any extra columns don't matter. Recognised columns:
//!
//! | Column              | Used for                                       |
//! |---------------------|------------------------------------------------|
//! | `Hostname`          | required; names the client and its config file |
//! | `Interface Address` | the client address in roster address mode      |
//! | `Interface Name`    | optional tunnel name                           |
//! | `Allowed IPs`       | optional client routes, default allow-all      |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Result, WiregenError};

/// Column holding the client hostname.
pub const HOSTNAME: &str = "Hostname";
/// Column holding the client address.
pub const INTERFACE_ADDRESS: &str = "Interface Address";
/// Column holding the client tunnel name.
pub const INTERFACE_NAME: &str = "Interface Name";
/// Column holding the client's allowed IPs.
pub const ALLOWED_IPS: &str = "Allowed IPs";

/// Parsed roster, records in file order.
#[derive(Debug, Clone)]
pub struct Roster {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl Roster {
    /// Parses a roster from CSV text.
    ///
    /// Cells are trimmed. Every record must have as many cells as the header.
    ///
    /// # Errors
    ///
    /// Returns [`WiregenError::Roster`] on malformed CSV or ragged rows.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut records = Vec::new();
        for result in reader.records() {
            records.push(result?);
        }

        Ok(Self { headers, records })
    }

    /// Reads and parses the roster at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WiregenError::Roster`] if the file cannot be opened or
    /// parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| WiregenError::Roster(format!("{}: {e}", path.display())))?;
        Self::from_reader(file)
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the roster has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in file order.
    pub fn records(&self) -> impl Iterator<Item = RosterRecord<'_>> {
        self.records
            .iter()
            .enumerate()
            .map(move |(index, record)| RosterRecord {
                roster: self,
                record,
                row: index + 1,
            })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// One data row with named-field access.
#[derive(Debug, Clone, Copy)]
pub struct RosterRecord<'a> {
    roster: &'a Roster,
    record: &'a StringRecord,
    row: usize,
}

impl<'a> RosterRecord<'a> {
    /// 1-based data row number; the header is not counted.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// The value of column `name`.
    ///
    /// # Errors
    ///
    /// Returns [`WiregenError::MissingField`] if the header has no such
    /// column.
    pub fn field(&self, name: &str) -> Result<&'a str> {
        self.roster
            .column(name)
            .and_then(|index| self.record.get(index))
            .ok_or_else(|| self.missing(name))
    }

    /// The value of column `name` when it exists and is not blank.
    #[must_use]
    pub fn optional_field(&self, name: &str) -> Option<&'a str> {
        self.field(name).ok().filter(|value| !value.is_empty())
    }

    /// The value of column `name`, which must exist and not be blank.
    ///
    /// # Errors
    ///
    /// Returns [`WiregenError::MissingField`] if the column is absent or the
    /// cell is blank.
    pub fn required_field(&self, name: &str) -> Result<&'a str> {
        self.optional_field(name).ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> WiregenError {
        WiregenError::MissingField {
            field: name.to_string(),
            row: self.row,
        }
    }
}
