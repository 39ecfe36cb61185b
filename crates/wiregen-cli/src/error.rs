//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;
use wiregen::WiregenError;
use wiregen_keys::KeyError;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Config generation failed.
    #[error(transparent)]
    Wiregen(#[from] WiregenError),

    /// Key generation failed.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// An interface definition could not be parsed.
    #[error("invalid interface definition {}: {source}", path.display())]
    Definition {
        /// The definition file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: toml::de::Error,
    },

    /// A file could not be read or written.
    #[error("{}: {source}", path.display())]
    File {
        /// The file or directory involved.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Both sides of a pair resolve to the same output directory.
    #[error("both sites would be written to {}", dir.display())]
    SharedSiteDirectory {
        /// The directory both sides map to.
        dir: PathBuf,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
