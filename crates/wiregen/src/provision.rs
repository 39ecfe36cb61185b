//! Provisioning runs: a server plus a roster of clients, or a site pair.
//!
//! Every run is all-or-nothing. Results are plain values; writing them out
//! is up to the caller.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};
use wiregen_keys::KeyService;

use crate::allocator::AddressAllocator;
use crate::config_file::ConfigFile;
use crate::error::{Result, WiregenError};
use crate::interface::{Interface, InterfaceConfig};
use crate::peer::{Peer, PeerOptions, ALLOW_ALL};
use crate::render::{render_router_script, RouterInterfaceOptions, RouterPeerOptions};
use crate::roster::{Roster, RosterRecord, ALLOWED_IPS, HOSTNAME, INTERFACE_ADDRESS, INTERFACE_NAME};

/// Appended to a client's address on the server side of router-script runs.
const IPV6_DEFAULT_ROUTE: &str = "::/0";

/// Keepalive given to client peers unless overridden.
pub const DEFAULT_CLIENT_KEEPALIVE: u16 = 25;

/// Where client addresses come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressMode {
    /// Next free host of the server's subnet.
    #[default]
    Allocate,
    /// The row's `Interface Address` column.
    Roster,
}

/// Options for [`BulkProvisioner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Source of client addresses.
    pub address_mode: AddressMode,
    /// Also produce a router script for the server. The server's peer for
    /// each client then also allows `::/0`.
    pub router_script: bool,
    /// Keepalive on each client's server peer.
    pub client_keepalive: Option<u16>,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            address_mode: AddressMode::Allocate,
            router_script: false,
            client_keepalive: Some(DEFAULT_CLIENT_KEEPALIVE),
        }
    }
}

/// One provisioned client.
#[derive(Debug, Clone)]
pub struct ProvisionedClient {
    /// Hostname as given in the roster.
    pub hostname: String,
    /// Hostname with spaces replaced, for use as a file name.
    pub file_stem: String,
    /// The client's config: its interface and the server peer.
    pub config: ConfigFile,
}

/// Output of [`BulkProvisioner::provision`].
#[derive(Debug, Clone)]
pub struct Provisioned {
    /// Server config with one peer per client, in roster order.
    pub server: ConfigFile,
    /// Client configs in roster order.
    pub clients: Vec<ProvisionedClient>,
    /// Server router script, when requested.
    pub router_script: Option<String>,
}

/// Turns a hostname into a file stem.
#[must_use]
pub fn sanitize_hostname(hostname: &str) -> String {
    hostname.replace(' ', "_")
}

/// Builds a server config and one client config per roster row.
pub struct BulkProvisioner<'k> {
    server: Arc<Interface>,
    keys: &'k dyn KeyService,
    options: ProvisionOptions,
}

impl std::fmt::Debug for BulkProvisioner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkProvisioner")
            .field("server", &self.server.address())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'k> BulkProvisioner<'k> {
    /// Creates a provisioner for `server`.
    #[must_use]
    pub fn new(server: Arc<Interface>, keys: &'k dyn KeyService, options: ProvisionOptions) -> Self {
        Self {
            server,
            keys,
            options,
        }
    }

    /// The server interface.
    #[must_use]
    pub fn server(&self) -> &Arc<Interface> {
        &self.server
    }

    /// Provisions every row of `roster`.
    ///
    /// Per row: a fresh pre-shared key, a client interface with a fresh key
    /// pair, the client's peer to the server and the server's peer to the
    /// client.
    ///
    /// # Errors
    ///
    /// Fails on the first bad row, leaving nothing behind:
    /// [`WiregenError::MissingField`] for an absent hostname (or address in
    /// roster mode), [`WiregenError::DuplicateHostname`],
    /// [`WiregenError::PoolExhausted`], [`WiregenError::InvalidCidr`] when
    /// the server address can't be allocated from, and any key or
    /// validation error.
    pub fn provision(&self, roster: &Roster) -> Result<Provisioned> {
        info!(
            server = self.server.address(),
            rows = roster.len(),
            mode = ?self.options.address_mode,
            "provisioning clients"
        );

        let mut allocator = match self.options.address_mode {
            AddressMode::Allocate => Some(AddressAllocator::for_interface_address(
                self.server.address(),
            )?),
            AddressMode::Roster => None,
        };

        let mut seen = HashSet::new();
        let mut server_peers = Vec::with_capacity(roster.len());
        let mut client_peers = Vec::with_capacity(roster.len());
        let mut clients = Vec::with_capacity(roster.len());

        for record in roster.records() {
            let hostname = record.required_field(HOSTNAME)?;
            let file_stem = sanitize_hostname(hostname);
            if !seen.insert(file_stem.clone()) {
                return Err(WiregenError::DuplicateHostname {
                    hostname: file_stem,
                });
            }

            let address = match allocator.as_mut() {
                Some(allocator) => allocator.next_address()?.to_string(),
                None => record.required_field(INTERFACE_ADDRESS)?.to_string(),
            };

            let psk = self.keys.generate_preshared_key()?;
            let client = Arc::new(self.client_interface(&record, hostname, &address)?);

            let allowed = record.optional_field(ALLOWED_IPS).unwrap_or(ALLOW_ALL);
            let client_peer = Peer::new(
                Arc::clone(&client),
                Arc::clone(&self.server),
                PeerOptions::new(allowed)
                    .with_persistent_keepalive(self.options.client_keepalive)
                    .with_preshared_key(psk.clone()),
            )?;
            let server_allowed = if self.options.router_script {
                format!("{address},{IPV6_DEFAULT_ROUTE}")
            } else {
                address.clone()
            };
            let server_peer = Peer::new(
                Arc::clone(&self.server),
                Arc::clone(&client),
                PeerOptions::new(server_allowed)
                    .with_preshared_key(psk)
                    .with_name(hostname),
            )?;

            debug!(row = record.row(), hostname, address = %address, allowed, "provisioned client");

            server_peers.push(server_peer);
            client_peers.push(client_peer.clone());
            clients.push(ProvisionedClient {
                hostname: hostname.to_string(),
                file_stem,
                config: ConfigFile::single(client, client_peer),
            });
        }

        let server = ConfigFile::new(Arc::clone(&self.server), server_peers);
        let router_script = self.options.router_script.then(|| {
            render_router_script(
                &ConfigFile::new(Arc::clone(&self.server), client_peers),
                &RouterInterfaceOptions::default(),
                &RouterPeerOptions::default(),
            )
        });

        info!(clients = clients.len(), "provisioning complete");
        Ok(Provisioned {
            server,
            clients,
            router_script,
        })
    }

    fn client_interface(&self, record: &RosterRecord<'_>, hostname: &str, address: &str) -> Result<Interface> {
        let mut config = InterfaceConfig::new(address).with_hostname(hostname);
        if let Some(name) = record.optional_field(INTERFACE_NAME) {
            config = config.with_interface_name(name);
        }
        Interface::new(config, self.keys)
    }
}

/// Output of [`provision_pair`].
#[derive(Debug, Clone)]
pub struct PairProvisioned {
    /// Config for the first site, peering with the second.
    pub first: ConfigFile,
    /// Config for the second site, peering with the first.
    pub second: ConfigFile,
}

impl PairProvisioned {
    /// Both configs, first then second.
    #[must_use]
    pub fn configs(&self) -> [&ConfigFile; 2] {
        [&self.first, &self.second]
    }

    /// Router script for one side: its interface and its single peer.
    #[must_use]
    pub fn router_script(config: &ConfigFile) -> String {
        render_router_script(
            config,
            &RouterInterfaceOptions::default(),
            &RouterPeerOptions::default(),
        )
    }
}

/// Links two sites with a shared pre-shared key.
///
/// Each side gets a config holding its own interface and a peer for the
/// other side, named after that side's hostname. A blank or absent `allowed`
/// means allow-all.
///
/// # Errors
///
/// Returns an error if the pre-shared key can't be generated.
pub fn provision_pair(
    first: Arc<Interface>,
    second: Arc<Interface>,
    allowed: Option<&str>,
    keys: &dyn KeyService,
) -> Result<PairProvisioned> {
    let allowed = allowed
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(ALLOW_ALL);
    let psk = keys.generate_preshared_key()?;

    let mut second_options = PeerOptions::new(allowed).with_preshared_key(psk.clone());
    if let Some(name) = second.hostname() {
        second_options = second_options.with_name(name);
    }
    let mut first_options = PeerOptions::new(allowed).with_preshared_key(psk);
    if let Some(name) = first.hostname() {
        first_options = first_options.with_name(name);
    }

    let second_as_peer = Peer::new(Arc::clone(&first), Arc::clone(&second), second_options)?;
    let first_as_peer = Peer::new(Arc::clone(&second), Arc::clone(&first), first_options)?;

    info!(
        first = first.address(),
        second = second.address(),
        allowed,
        "provisioned site pair"
    );

    Ok(PairProvisioned {
        first: ConfigFile::single(first, second_as_peer),
        second: ConfigFile::single(second, first_as_peer),
    })
}
