//! Key pair generation command.

use std::io::Write;

use wiregen_keys::KeyService;

use crate::error::CliError;

/// Genkey command executor.
pub struct GenkeyCommand<'k> {
    keys: &'k dyn KeyService,
}

impl<'k> GenkeyCommand<'k> {
    /// Create a new genkey command.
    #[must_use]
    pub fn new(keys: &'k dyn KeyService) -> Self {
        Self { keys }
    }

    /// Execute the genkey command.
    ///
    /// # Errors
    ///
    /// Returns an error if key generation or output fails.
    pub fn execute<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let pair = self.keys.generate_key_pair()?;
        writeln!(writer, "Private Key: {}", pair.private_key().to_base64())?;
        writeln!(writer, "Public Key: {}", pair.public_key())?;
        Ok(())
    }
}
