//! CLI command implementations.
//!
//! - [`genkey`] - Print a fresh key pair
//! - [`clients`] - Server plus roster of clients
//! - [`pair`] - Two linked sites

pub mod clients;
pub mod genkey;
pub mod pair;

pub use clients::ClientsCommand;
pub use genkey::GenkeyCommand;
pub use pair::PairCommand;

use std::io::Write;
use std::path::PathBuf;

use crate::error::CliError;

/// Prints each written path on its own line.
pub(crate) fn report_written<W: Write>(writer: &mut W, written: &[PathBuf]) -> Result<(), CliError> {
    for path in written {
        writeln!(writer, "{}", path.display())?;
    }
    Ok(())
}
