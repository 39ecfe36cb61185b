//! Error types for config generation.

use thiserror::Error;
use wiregen_keys::KeyError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WiregenError>;

/// Errors that abort an interface/peer construction or a provisioning run.
#[derive(Debug, Error)]
pub enum WiregenError {
    /// A field value is outside its permitted range or blank.
    #[error("invalid {field}: {value}")]
    InvalidConfiguration {
        /// Config field name, as written in the rendered config.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Key material was malformed or could not be produced.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The address pool has no addresses left.
    #[error("address pool {subnet} is exhausted")]
    PoolExhausted {
        /// The subnet being allocated from.
        subnet: String,
    },

    /// A roster row lacks a required column or value.
    #[error("roster row {row} is missing required field {field:?}")]
    MissingField {
        /// The column name.
        field: String,
        /// 1-based data row number.
        row: usize,
    },

    /// Two roster rows map to the same output name.
    #[error("duplicate hostname in roster: {hostname}")]
    DuplicateHostname {
        /// The colliding (sanitized) hostname.
        hostname: String,
    },

    /// A subnet string could not be used for allocation.
    #[error("invalid CIDR: {0}")]
    InvalidCidr(String),

    /// The roster could not be read as CSV.
    #[error("roster error: {0}")]
    Roster(String),

    /// The interface already has a name.
    #[error("interface name already set to {0}")]
    InterfaceNameAlreadySet(String),
}

impl WiregenError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidConfiguration {
            field,
            value: value.to_string(),
        }
    }
}

impl From<csv::Error> for WiregenError {
    fn from(err: csv::Error) -> Self {
        Self::Roster(err.to_string())
    }
}
