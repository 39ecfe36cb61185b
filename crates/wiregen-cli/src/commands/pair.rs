//! Site pair command.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use wiregen::{provision_pair, Interface};
use wiregen_keys::KeyService;

use crate::cli::PairArgs;
use crate::definition::load_definition;
use crate::error::CliError;
use crate::output::ArtifactSink;

use super::report_written;

/// Pair command executor.
pub struct PairCommand<'k> {
    keys: &'k dyn KeyService,
    sink: ArtifactSink,
}

impl<'k> PairCommand<'k> {
    /// Create a new pair command.
    #[must_use]
    pub fn new(keys: &'k dyn KeyService, sink: ArtifactSink) -> Self {
        Self { keys, sink }
    }

    /// Execute the pair command.
    ///
    /// # Errors
    ///
    /// Returns an error if either definition can't be loaded, key
    /// generation fails or the output can't be written.
    pub fn execute<W: Write>(&self, writer: &mut W, args: &PairArgs) -> Result<(), CliError> {
        let first = self.load(&args.first)?;
        let second = self.load(&args.second)?;
        let pair = provision_pair(first, second, args.allowed.as_deref(), self.keys)?;

        let written = self.sink.write_pair(&pair)?;
        report_written(writer, &written)
    }

    fn load(&self, path: &Path) -> Result<Arc<Interface>, CliError> {
        Ok(Arc::new(Interface::new(load_definition(path)?, self.keys)?))
    }
}
