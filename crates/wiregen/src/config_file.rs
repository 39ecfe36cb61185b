//! Per-host config bundles.

use std::sync::Arc;

use crate::interface::Interface;
use crate::peer::Peer;

/// One host's interface together with its peers, in insertion order.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    interface: Arc<Interface>,
    peers: Vec<Peer>,
}

impl ConfigFile {
    /// Bundles `interface` with `peers`.
    #[must_use]
    pub fn new(interface: Arc<Interface>, peers: Vec<Peer>) -> Self {
        Self { interface, peers }
    }

    /// Bundles `interface` with a single peer.
    #[must_use]
    pub fn single(interface: Arc<Interface>, peer: Peer) -> Self {
        Self::new(interface, vec![peer])
    }

    /// The host's interface.
    #[must_use]
    pub fn interface(&self) -> &Arc<Interface> {
        &self.interface
    }

    /// Peers in insertion order.
    #[must_use]
    pub fn peers(&self) -> &[Peer] {
        &self.peers
    }
}

impl From<Peer> for ConfigFile {
    /// Uses the peer's local interface as the host.
    fn from(peer: Peer) -> Self {
        Self::single(Arc::clone(peer.local()), peer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::InterfaceConfig;
    use crate::peer::{PeerOptions, ALLOW_ALL};
    use wiregen_keys::testing::SeededKeyService;

    fn iface(address: &str, keys: &SeededKeyService) -> Arc<Interface> {
        Arc::new(Interface::new(InterfaceConfig::new(address), keys).expect("valid"))
    }

    #[test]
    fn single_peer_becomes_one_element_list() {
        let keys = SeededKeyService::new();
        let a = iface("10.0.0.1/24", &keys);
        let b = iface("10.0.0.2", &keys);
        let peer = Peer::new(a.clone(), b, PeerOptions::new(ALLOW_ALL)).expect("peer");
        let config = ConfigFile::from(peer);
        assert_eq!(config.peers().len(), 1);
        assert!(Arc::ptr_eq(config.interface(), &a));
    }

    #[test]
    fn peers_keep_insertion_order() {
        let keys = SeededKeyService::new();
        let hub = iface("10.0.0.1/24", &keys);
        let peers: Vec<_> = ["10.0.0.3", "10.0.0.2", "10.0.0.4"]
            .into_iter()
            .map(|addr| {
                Peer::new(hub.clone(), iface(addr, &keys), PeerOptions::new(addr)).expect("peer")
            })
            .collect();
        let config = ConfigFile::new(hub, peers);
        let order: Vec<_> = config.peers().iter().map(Peer::peer_ip).collect();
        assert_eq!(order, vec!["10.0.0.3", "10.0.0.2", "10.0.0.4"]);
    }
}
