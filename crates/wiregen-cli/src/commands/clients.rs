//! Bulk client provisioning command.

use std::io::Write;
use std::sync::Arc;

use tracing::info;
use wiregen::{BulkProvisioner, Interface, ProvisionOptions, Roster};
use wiregen_keys::KeyService;

use crate::cli::ClientsArgs;
use crate::definition::load_definition;
use crate::error::CliError;
use crate::output::ArtifactSink;

use super::report_written;

/// Clients command executor.
pub struct ClientsCommand<'k> {
    keys: &'k dyn KeyService,
    sink: ArtifactSink,
}

impl<'k> ClientsCommand<'k> {
    /// Create a new clients command.
    #[must_use]
    pub fn new(keys: &'k dyn KeyService, sink: ArtifactSink) -> Self {
        Self { keys, sink }
    }

    /// Execute the clients command.
    ///
    /// Nothing is written unless every roster row provisions cleanly.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs can't be loaded, provisioning fails or
    /// the output can't be written.
    pub fn execute<W: Write>(&self, writer: &mut W, args: &ClientsArgs) -> Result<(), CliError> {
        let server = Interface::new(load_definition(&args.server)?, self.keys)?;
        let roster = Roster::from_path(&args.roster)?;
        info!(roster = %args.roster.display(), rows = roster.len(), "loaded roster");

        let options = ProvisionOptions {
            address_mode: args.address_mode.into(),
            router_script: args.mikrotik,
            client_keepalive: args.client_keepalive(),
        };
        let provisioned = BulkProvisioner::new(Arc::new(server), self.keys, options).provision(&roster)?;

        let written = self.sink.write_bulk(&provisioned)?;
        report_written(writer, &written)
    }
}
