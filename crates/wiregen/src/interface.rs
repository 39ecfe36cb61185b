//! Tunnel endpoints.
//!
//! An [`Interface`] is built once from an [`InterfaceConfig`] in a single
//! validation pass and is read-only afterwards. The one exception is the
//! interface name, which is a set-once cell: it is either given up front,
//! assigned once later, or derived from the public key the first time a
//! router script needs it.

use std::fmt;

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;
use wiregen_keys::{validate_key, KeyPair, KeyService, PrivateKey, PublicKey};

use crate::error::{Result, WiregenError};

/// Default `WireGuard` listen port.
pub const DEFAULT_LISTEN_PORT: u32 = 51820;

/// Ports below this are in the well-known range.
pub const WELL_KNOWN_PORT_LIMIT: u32 = 1024;

/// Smallest MTU accepted.
pub const MIN_MTU: u32 = 64;

/// Largest MTU accepted.
pub const MAX_MTU: u32 = 65535;

/// MTUs above this exceed common jumbo frame sizes.
pub const JUMBO_FRAME_MTU: u32 = 9216;

/// Prefix of derived router interface names.
pub const DERIVED_NAME_PREFIX: &str = "wg-tunnel-";

static NAME_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]{4}").unwrap_or_else(|_| unreachable!()));

/// Everything needed to build an [`Interface`].
///
/// Only `address` is required. Key fields hold base64 key text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterfaceConfig {
    /// Tunnel address, e.g. `10.0.0.1/24`.
    pub address: String,
    /// Public host name or IP peers connect to; the port is appended from
    /// `listen_port`.
    pub endpoint: Option<String>,
    /// Display name of the host.
    pub hostname: Option<String>,
    /// Name of the tunnel interface on the host.
    pub interface_name: Option<String>,
    /// Base64 private key.
    pub private_key: Option<String>,
    /// Base64 public key; only honored together with `private_key`.
    pub public_key: Option<String>,
    /// UDP listen port.
    pub listen_port: u32,
    /// DNS servers, as written into the config.
    pub dns: Option<String>,
    /// Routing table id.
    pub table: Option<u32>,
    /// Interface MTU.
    pub mtu: Option<u32>,
    /// `PreUp` hook command.
    pub pre_up: Option<String>,
    /// `PostUp` hook command.
    pub post_up: Option<String>,
    /// `PreDown` hook command.
    pub pre_down: Option<String>,
    /// `PostDown` hook command.
    pub post_down: Option<String>,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            endpoint: None,
            hostname: None,
            interface_name: None,
            private_key: None,
            public_key: None,
            listen_port: DEFAULT_LISTEN_PORT,
            dns: None,
            table: None,
            mtu: None,
            pre_up: None,
            post_up: None,
            pre_down: None,
            post_down: None,
        }
    }
}

impl InterfaceConfig {
    /// Creates a config with the given address and defaults elsewhere.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Sets the endpoint host.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Sets the interface name.
    #[must_use]
    pub fn with_interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = Some(name.into());
        self
    }

    /// Sets the private key.
    #[must_use]
    pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// Sets the public key.
    #[must_use]
    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }

    /// Sets the listen port.
    #[must_use]
    pub fn with_listen_port(mut self, port: u32) -> Self {
        self.listen_port = port;
        self
    }

    /// Sets the DNS servers.
    #[must_use]
    pub fn with_dns(mut self, dns: impl Into<String>) -> Self {
        self.dns = Some(dns.into());
        self
    }

    /// Sets the routing table id.
    #[must_use]
    pub fn with_table(mut self, table: u32) -> Self {
        self.table = Some(table);
        self
    }

    /// Sets the MTU.
    #[must_use]
    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = Some(mtu);
        self
    }

    /// Sets all four hook commands at once; `None` leaves a hook unset.
    #[must_use]
    pub fn with_hooks(
        mut self,
        pre_up: Option<&str>,
        post_up: Option<&str>,
        pre_down: Option<&str>,
        post_down: Option<&str>,
    ) -> Self {
        self.pre_up = pre_up.map(str::to_string);
        self.post_up = post_up.map(str::to_string);
        self.pre_down = pre_down.map(str::to_string);
        self.post_down = post_down.map(str::to_string);
        self
    }
}

/// A non-fatal diagnostic raised while building an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// The listen port is below 1024.
    WellKnownListenPort(u16),
    /// The MTU is above common jumbo frame sizes.
    JumboMtu(u16),
    /// A public key was supplied without its private key; a new pair was
    /// generated instead.
    PublicKeyWithoutPrivateKey,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WellKnownListenPort(port) => write!(
                f,
                "listen port ({port}) is in the well-known port range, a port of 1024 or higher is suggested"
            ),
            Self::JumboMtu(mtu) => write!(
                f,
                "MTU ({mtu}) is above common jumbo frame size, this may not work as expected"
            ),
            Self::PublicKeyWithoutPrivateKey => {
                f.write_str("public key supplied without private key, generated a new pair")
            }
        }
    }
}

/// One tunnel endpoint: its address, keys and network parameters.
#[derive(Debug)]
pub struct Interface {
    address: String,
    endpoint: Option<String>,
    hostname: Option<String>,
    interface_name: OnceCell<String>,
    private_key: PrivateKey,
    public_key: PublicKey,
    listen_port: u16,
    dns: Option<String>,
    table: Option<u32>,
    mtu: Option<u16>,
    pre_up: Option<String>,
    post_up: Option<String>,
    pre_down: Option<String>,
    post_down: Option<String>,
    advisories: Vec<Advisory>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Interface {
    /// Validates `config` and resolves its keys through `keys`.
    ///
    /// Key handling:
    /// - no keys: a fresh pair is generated;
    /// - private key only: the public key is derived from it;
    /// - both keys: used verbatim, the key service is not called;
    /// - public key only: an advisory is raised and a fresh pair generated.
    ///
    /// # Errors
    ///
    /// Returns [`WiregenError::InvalidConfiguration`] for a blank address, a
    /// listen port above 65535 or an MTU outside 64..=65535, and
    /// [`WiregenError::Key`] if key material is malformed or cannot be
    /// produced.
    pub fn new(config: InterfaceConfig, keys: &dyn KeyService) -> Result<Self> {
        let mut advisories = Vec::new();

        let address = config.address.trim().to_string();
        if address.is_empty() {
            return Err(WiregenError::invalid("Address", "<empty>"));
        }

        let listen_port = u16::try_from(config.listen_port)
            .map_err(|_| WiregenError::invalid("ListenPort", config.listen_port))?;
        if config.listen_port < WELL_KNOWN_PORT_LIMIT {
            advisories.push(Advisory::WellKnownListenPort(listen_port));
        }

        let mtu = match config.mtu {
            Some(mtu) if (MIN_MTU..=MAX_MTU).contains(&mtu) => {
                if mtu > JUMBO_FRAME_MTU {
                    advisories.push(Advisory::JumboMtu(mtu as u16));
                }
                Some(mtu as u16)
            }
            Some(mtu) => return Err(WiregenError::invalid("MTU", mtu)),
            None => None,
        };

        let private_key = non_blank(config.private_key);
        let public_key = non_blank(config.public_key);
        let pair = match (private_key, public_key) {
            (None, None) => keys.generate_key_pair()?,
            (Some(private), None) => keys.derive_key_pair(&private)?,
            (Some(private), Some(public)) => KeyPair::from_parts(
                PrivateKey::from_base64(validate_key(&private)?)?,
                PublicKey::from_base64(validate_key(&public)?)?,
            ),
            (None, Some(_)) => {
                advisories.push(Advisory::PublicKeyWithoutPrivateKey);
                keys.generate_key_pair()?
            }
        };
        let (private_key, public_key) = pair.into_parts();

        let hostname = non_blank(config.hostname);
        for advisory in &advisories {
            warn!(
                address = %address,
                hostname = hostname.as_deref().unwrap_or("-"),
                "{advisory}"
            );
        }

        let interface_name = OnceCell::new();
        if let Some(name) = non_blank(config.interface_name) {
            let _ = interface_name.set(name);
        }

        Ok(Self {
            address,
            endpoint: non_blank(config.endpoint),
            hostname,
            interface_name,
            private_key,
            public_key,
            listen_port,
            dns: non_blank(config.dns),
            table: config.table,
            mtu,
            pre_up: non_blank(config.pre_up),
            post_up: non_blank(config.post_up),
            pre_down: non_blank(config.pre_down),
            post_down: non_blank(config.post_down),
            advisories,
        })
    }

    /// Tunnel address as configured.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Endpoint host, without port.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Display name of the host.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// Interface name, if given or already derived.
    #[must_use]
    pub fn interface_name(&self) -> Option<&str> {
        self.interface_name.get().map(String::as_str)
    }

    /// Assigns the interface name.
    ///
    /// # Errors
    ///
    /// Returns [`WiregenError::InterfaceNameAlreadySet`] if a name was given
    /// at construction, assigned before, or already derived.
    pub fn assign_interface_name(&self, name: impl Into<String>) -> Result<()> {
        self.interface_name
            .set(name.into())
            .map_err(|_| WiregenError::InterfaceNameAlreadySet(self.router_interface_name().to_string()))
    }

    /// Interface name for router scripts.
    ///
    /// Without an explicit name, `wg-tunnel-<fragment>` is derived from the
    /// first four-character alphanumeric run of the base64 public key and
    /// kept for every later call.
    pub fn router_interface_name(&self) -> &str {
        self.interface_name.get_or_init(|| {
            let encoded = self.public_key.to_base64();
            let fragment = NAME_FRAGMENT.find(&encoded).map_or_else(
                || {
                    let bytes = self.public_key.as_bytes();
                    format!("{:02x}{:02x}", bytes[0], bytes[1])
                },
                |m| m.as_str().to_string(),
            );
            format!("{DERIVED_NAME_PREFIX}{fragment}")
        })
    }

    /// The private key.
    #[must_use]
    pub const fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The public key.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// UDP listen port.
    #[must_use]
    pub const fn listen_port(&self) -> u16 {
        self.listen_port
    }

    /// DNS servers.
    #[must_use]
    pub fn dns(&self) -> Option<&str> {
        self.dns.as_deref()
    }

    /// Routing table id.
    #[must_use]
    pub const fn table(&self) -> Option<u32> {
        self.table
    }

    /// Interface MTU.
    #[must_use]
    pub const fn mtu(&self) -> Option<u16> {
        self.mtu
    }

    /// `PreUp` hook.
    #[must_use]
    pub fn pre_up(&self) -> Option<&str> {
        self.pre_up.as_deref()
    }

    /// `PostUp` hook.
    #[must_use]
    pub fn post_up(&self) -> Option<&str> {
        self.post_up.as_deref()
    }

    /// `PreDown` hook.
    #[must_use]
    pub fn pre_down(&self) -> Option<&str> {
        self.pre_down.as_deref()
    }

    /// `PostDown` hook.
    #[must_use]
    pub fn post_down(&self) -> Option<&str> {
        self.post_down.as_deref()
    }

    /// Advisories raised during construction.
    #[must_use]
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }
}
