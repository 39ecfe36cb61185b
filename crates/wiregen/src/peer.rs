//! Directional peer relationships.

use std::sync::Arc;

use wiregen_keys::{PresharedKey, PrivateKey, PublicKey};

use crate::error::{Result, WiregenError};
use crate::interface::Interface;

/// Allowed IPs used when nothing narrower is requested.
pub const ALLOW_ALL: &str = "0.0.0.0/0, ::/0";

/// Per-relationship settings for [`Peer::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerOptions {
    /// Routes the peer may carry, as written into the config.
    pub allowed_ips: String,
    /// Keepalive interval in seconds.
    pub persistent_keepalive: Option<u16>,
    /// Pre-shared key, the same on both sides of the link.
    pub preshared_key: Option<PresharedKey>,
    /// Display name overriding the remote hostname.
    pub name: Option<String>,
}

impl PeerOptions {
    /// Creates options with the given allowed IPs.
    #[must_use]
    pub fn new(allowed_ips: impl Into<String>) -> Self {
        Self {
            allowed_ips: allowed_ips.into(),
            ..Self::default()
        }
    }

    /// Sets the keepalive interval.
    #[must_use]
    pub fn with_persistent_keepalive(mut self, seconds: Option<u16>) -> Self {
        self.persistent_keepalive = seconds;
        self
    }

    /// Sets the pre-shared key.
    #[must_use]
    pub fn with_preshared_key(mut self, key: PresharedKey) -> Self {
        self.preshared_key = Some(key);
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// How `local` sees `remote`.
///
/// Both interfaces are held through shared read-only handles so that the
/// router renderer can reach either side.
#[derive(Debug, Clone)]
pub struct Peer {
    local: Arc<Interface>,
    remote: Arc<Interface>,
    allowed_ips: String,
    endpoint: Option<String>,
    name: Option<String>,
    persistent_keepalive: Option<u16>,
    preshared_key: Option<PresharedKey>,
}

impl Peer {
    /// Builds the peer entry `local` uses to reach `remote`.
    ///
    /// The endpoint is `remote`'s endpoint host joined with its listen port,
    /// and only exists when the remote has an endpoint. The allowed IPs are
    /// taken as written.
    ///
    /// # Errors
    ///
    /// Returns [`WiregenError::InvalidConfiguration`] if `allowed_ips` is
    /// blank.
    pub fn new(local: Arc<Interface>, remote: Arc<Interface>, options: PeerOptions) -> Result<Self> {
        let allowed_ips = options.allowed_ips.trim().to_string();
        if allowed_ips.is_empty() {
            return Err(WiregenError::invalid("AllowedIPs", "<empty>"));
        }

        let endpoint = remote
            .endpoint()
            .map(|host| format!("{host}:{}", remote.listen_port()));
        let name = options
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| remote.hostname().map(str::to_string));

        Ok(Self {
            local,
            remote,
            allowed_ips,
            endpoint,
            name,
            persistent_keepalive: options.persistent_keepalive,
            preshared_key: options.preshared_key,
        })
    }

    /// The interface this entry belongs to.
    #[must_use]
    pub fn local(&self) -> &Arc<Interface> {
        &self.local
    }

    /// The interface this entry points at.
    #[must_use]
    pub fn remote(&self) -> &Arc<Interface> {
        &self.remote
    }

    /// The remote's public key.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        self.remote.public_key()
    }

    /// The local private key.
    #[must_use]
    pub fn private_key(&self) -> &PrivateKey {
        self.local.private_key()
    }

    /// The remote's tunnel address.
    #[must_use]
    pub fn peer_ip(&self) -> &str {
        self.remote.address()
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `host:port` of the remote, when it has an endpoint.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Allowed IPs, as written.
    #[must_use]
    pub fn allowed_ips(&self) -> &str {
        &self.allowed_ips
    }

    /// Keepalive interval in seconds.
    #[must_use]
    pub const fn persistent_keepalive(&self) -> Option<u16> {
        self.persistent_keepalive
    }

    /// Pre-shared key.
    #[must_use]
    pub const fn preshared_key(&self) -> Option<&PresharedKey> {
        self.preshared_key.as_ref()
    }
}
