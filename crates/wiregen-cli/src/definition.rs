//! Interface definition files.
//!
//! A definition is a TOML document whose keys mirror [`InterfaceConfig`]:
//!
//! ```toml
//! address = "10.0.0.1/24"
//! endpoint = "vpn.example.com"
//! hostname = "hub"
//! listen_port = 51820
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;
use wiregen::InterfaceConfig;

use crate::error::CliError;

/// Parses an interface definition from TOML text.
///
/// # Errors
///
/// Returns [`CliError::Definition`] on malformed TOML or unknown keys.
pub fn parse_definition(path: &Path, text: &str) -> Result<InterfaceConfig, CliError> {
    toml::from_str(text).map_err(|source| CliError::Definition {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses the interface definition at `path`.
///
/// # Errors
///
/// Returns [`CliError::File`] if the file can't be read and
/// [`CliError::Definition`] if it can't be parsed.
pub fn load_definition(path: &Path) -> Result<InterfaceConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::file(path, e))?;
    let config = parse_definition(path, &text)?;
    debug!(path = %path.display(), address = %config.address, "loaded interface definition");
    Ok(config)
}
