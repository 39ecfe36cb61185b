//! # wiregen-cli
//!
//! WireGen command-line interface.
//!
//! Provides commands for:
//! - Generating a key pair
//! - Provisioning a server and a CSV roster of clients
//! - Linking two sites
//!
//! Interface definitions are read from TOML files, generated configs and
//! MikroTik scripts are written under the output directory.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod definition;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, KeyBackend};
pub use error::CliError;
pub use output::ArtifactSink;

use wiregen_keys::{KeyService, LocalKeyService, WgToolKeyService};

/// Builds the key service for `backend`.
#[must_use]
pub fn key_service(backend: KeyBackend) -> Box<dyn KeyService> {
    match backend {
        KeyBackend::Local => Box::new(LocalKeyService::new()),
        KeyBackend::Wg => Box::new(WgToolKeyService::default()),
    }
}
