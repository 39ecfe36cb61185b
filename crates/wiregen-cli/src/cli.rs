//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use wiregen::AddressMode;

/// WireGen - WireGuard config and MikroTik script generator.
#[derive(Parser, Debug, Clone)]
#[command(name = "wiregen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Key generation backend.
    #[arg(short, long, value_enum, env = "WIREGEN_KEYS", default_value_t = KeyBackend::Local)]
    pub keys: KeyBackend,

    /// Directory generated files are written under.
    #[arg(short, long, env = "WIREGEN_OUTPUT", default_value = "output")]
    pub output: PathBuf,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Where key material comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KeyBackend {
    /// In-process x25519.
    #[default]
    Local,
    /// The `wg` command-line tool.
    Wg,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print a fresh key pair.
    Genkey,

    /// Generate a server config and one config per roster row.
    Clients(ClientsArgs),

    /// Generate configs linking two sites.
    Pair(PairArgs),
}

/// How client addresses are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AddressModeArg {
    /// Next free host of the server's subnet.
    #[default]
    Allocate,
    /// The roster's `Interface Address` column.
    Roster,
}

impl From<AddressModeArg> for AddressMode {
    fn from(arg: AddressModeArg) -> Self {
        match arg {
            AddressModeArg::Allocate => Self::Allocate,
            AddressModeArg::Roster => Self::Roster,
        }
    }
}

/// Arguments for the clients command.
#[derive(Args, Debug, Clone)]
pub struct ClientsArgs {
    /// Server interface definition (TOML).
    #[arg(short, long)]
    pub server: PathBuf,

    /// Client roster (CSV with a header row).
    #[arg(short, long, default_value = "clients.csv")]
    pub roster: PathBuf,

    /// Also write a MikroTik script for the server.
    #[arg(short, long)]
    pub mikrotik: bool,

    /// How client addresses are chosen.
    #[arg(short, long, value_enum, default_value_t = AddressModeArg::Allocate)]
    pub address_mode: AddressModeArg,

    /// Keepalive interval for client peers, in seconds.
    #[arg(long, default_value_t = wiregen::provision::DEFAULT_CLIENT_KEEPALIVE, conflicts_with = "no_keepalive")]
    pub keepalive: u16,

    /// Leave keepalive out of client configs.
    #[arg(long)]
    pub no_keepalive: bool,
}

impl ClientsArgs {
    /// The keepalive to put in client configs.
    #[must_use]
    pub const fn client_keepalive(&self) -> Option<u16> {
        if self.no_keepalive || self.keepalive == 0 {
            None
        } else {
            Some(self.keepalive)
        }
    }
}

/// Arguments for the pair command.
#[derive(Args, Debug, Clone)]
pub struct PairArgs {
    /// First site's interface definition (TOML).
    #[arg(long)]
    pub first: PathBuf,

    /// Second site's interface definition (TOML).
    #[arg(long)]
    pub second: PathBuf,

    /// Allowed IPs on both sides; allow-all when omitted.
    #[arg(short, long)]
    pub allowed: Option<String>,
}
