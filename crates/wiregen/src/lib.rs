//! WireGuard config and MikroTik script generation.
//!
//! The model is small: an [`Interface`] is one tunnel endpoint, a [`Peer`]
//! is how one interface sees another, and a [`ConfigFile`] bundles one
//! host's interface with its peers. Configs render either as `wg-quick`
//! files ([`render_native`]) or as RouterOS scripts
//! ([`render_router_script`]).
//!
//! Two provisioning flows build the model for you:
//! - [`BulkProvisioner`] turns a server interface and a CSV [`Roster`] into a
//!   server config plus one config per client.
//! - [`provision_pair`] links two sites with a shared pre-shared key.
//!
//! Key material always comes from a [`wiregen_keys::KeyService`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use wiregen::{BulkProvisioner, Interface, InterfaceConfig, ProvisionOptions, Roster};
//! use wiregen_keys::LocalKeyService;
//!
//! # fn main() -> wiregen::Result<()> {
//! let keys = LocalKeyService::new();
//! let server = Arc::new(Interface::new(
//!     InterfaceConfig::new("10.0.0.1/24").with_endpoint("vpn.example.com"),
//!     &keys,
//! )?);
//! let roster = Roster::from_path("clients.csv")?;
//! let result = BulkProvisioner::new(server, &keys, ProvisionOptions::default())
//!     .provision(&roster)?;
//! println!("{}", wiregen::render_native(&result.server));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod allocator;
pub mod config_file;
pub mod error;
pub mod interface;
pub mod peer;
pub mod provision;
pub mod render;
pub mod roster;

pub use allocator::AddressAllocator;
pub use config_file::ConfigFile;
pub use error::{Result, WiregenError};
pub use interface::{Advisory, Interface, InterfaceConfig, DEFAULT_LISTEN_PORT};
pub use peer::{Peer, PeerOptions, ALLOW_ALL};
pub use provision::{
    provision_pair, sanitize_hostname, AddressMode, BulkProvisioner, PairProvisioned,
    ProvisionOptions, Provisioned, ProvisionedClient,
};
pub use render::{
    render_native, render_router_interface, render_router_peer, render_router_script,
    RouterInterfaceOptions, RouterPeerOptions,
};
pub use roster::{Roster, RosterRecord};
