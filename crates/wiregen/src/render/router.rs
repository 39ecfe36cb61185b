//! MikroTik RouterOS script rendering.
//!
//! The script is meant to be pasted into a RouterOS terminal. Interface
//! commands create the tunnel, assign its address and (optionally) open the
//! listen port; peer commands attach a remote to an existing tunnel.

use super::Field;
use crate::config_file::ConfigFile;
use crate::interface::Interface;
use crate::peer::Peer;

/// Options for [`render_router_interface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterInterfaceOptions {
    /// Comment attached to the interface.
    pub comment: Option<String>,
    /// Create the interface disabled.
    pub disabled: bool,
    /// Emit IPv4 and IPv6 firewall rules accepting the listen port.
    pub firewall_rules: bool,
}

impl Default for RouterInterfaceOptions {
    fn default() -> Self {
        Self {
            comment: None,
            disabled: false,
            firewall_rules: true,
        }
    }
}

/// Options for [`render_router_peer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterPeerOptions {
    /// The local side is a client: route its own address (and optionally
    /// all IPv6) instead of the peer's allowed IPs.
    pub client: bool,
    /// In client mode, append `::/0` to the allowed address.
    pub allow_all_ipv6: bool,
}

impl Default for RouterPeerOptions {
    fn default() -> Self {
        Self {
            client: true,
            allow_all_ipv6: true,
        }
    }
}

const FIREWALL_FAMILIES: [&str; 2] = ["ip", "ipv6"];

const PEER_KEYS: &[Field<Peer>] = &[
    ("PublicKey", |p| Some(p.public_key().to_base64())),
    ("PrivateKey", |p| Some(p.private_key().to_base64())),
    ("PresharedKey", |p| p.preshared_key().map(|k| k.to_base64())),
    ("PersistentKeepalive", |p| {
        p.persistent_keepalive().map(|s| s.to_string())
    }),
];

/// Server-mode peer fields, keyed by their RouterOS names.
const SERVER_PEER_KEYS: &[Field<Peer>] = &[
    ("allowed-address", |p| Some(p.allowed_ips().to_string())),
    ("endpoint-address", |p| p.endpoint().map(str::to_string)),
];

/// `PublicKey` -> `public-key`.
fn kebab_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len() + 4);
    for (i, c) in label.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Renders the commands creating `interface` on a router.
///
/// Output, one command per line: the `add` command with `name`, `comment`,
/// `mtu`, `disabled`, `private-key` and `listen-port` (absent ones left
/// out), the address assignment, then the two firewall rules when
/// requested. Without an explicit interface name one is derived from the
/// public key and kept on the interface.
#[must_use]
pub fn render_router_interface(interface: &Interface, options: &RouterInterfaceOptions) -> String {
    let name = interface.router_interface_name();

    let tokens: [(&str, Option<String>); 6] = [
        ("name", Some(name.to_string())),
        ("comment", options.comment.as_ref().map(|c| format!("\"{c}\""))),
        ("mtu", interface.mtu().map(|m| m.to_string())),
        ("disabled", options.disabled.then(|| "yes".to_string())),
        (
            "private-key",
            Some(format!("\"{}\"", interface.private_key().to_base64())),
        ),
        ("listen-port", Some(interface.listen_port().to_string())),
    ];

    let mut out = String::from("/interface/wireguard/add");
    for (key, value) in tokens {
        if let Some(value) = value {
            out.push_str(&format!(" {key}={value}"));
        }
    }

    out.push_str(&format!(
        "\n/ip/address/add interface={name} address={}",
        interface.address()
    ));

    if options.firewall_rules {
        for family in FIREWALL_FAMILIES {
            out.push_str(&format!(
                "\n/{family}/firewall/filter/add chain=input action=accept protocol=udp dst-port={} comment=\"Wireguard {name} Listen Port\"",
                interface.listen_port()
            ));
        }
    }

    out
}

/// Renders the command attaching `peer` to its remote's tunnel.
///
/// In client mode the allowed address is the local interface's own address
/// (plus `::/0` when `allow_all_ipv6`); otherwise the peer's allowed IPs and
/// endpoint are used.
#[must_use]
pub fn render_router_peer(peer: &Peer, options: &RouterPeerOptions) -> String {
    let mut out = format!(
        "/interface/wireguard/peers/add interface={}",
        peer.remote().router_interface_name()
    );
    if let Some(hostname) = peer.local().hostname() {
        out.push_str(&format!(" comment=\"{hostname}\""));
    }

    for (label, get) in PEER_KEYS {
        if let Some(value) = get(peer) {
            out.push_str(&format!(" {}=\"{value}\"", kebab_case(label)));
        }
    }

    if options.client {
        let address = peer.local().address();
        if options.allow_all_ipv6 {
            out.push_str(&format!(" allowed-address=\"{address},::/0\""));
        } else {
            out.push_str(&format!(" allowed-address=\"{address}\""));
        }
    } else {
        for (key, get) in SERVER_PEER_KEYS {
            if let Some(value) = get(peer) {
                out.push_str(&format!(" {key}=\"{value}\""));
            }
        }
    }

    out
}

/// Renders the interface commands of `config` followed by one command per
/// peer.
#[must_use]
pub fn render_router_script(
    config: &ConfigFile,
    interface_options: &RouterInterfaceOptions,
    peer_options: &RouterPeerOptions,
) -> String {
    let mut lines = vec![render_router_interface(config.interface(), interface_options)];
    lines.extend(
        config
            .peers()
            .iter()
            .map(|peer| render_router_peer(peer, peer_options)),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::interface::InterfaceConfig;
    use crate::peer::PeerOptions;
    use regex::Regex;
    use test_case::test_case;
    use wiregen_keys::testing::SeededKeyService;
    use wiregen_keys::{PresharedKey, PrivateKey, KEY_SIZE};

    fn key(byte: u8) -> String {
        PrivateKey::from_bytes_array([byte; KEY_SIZE]).to_base64()
    }

    fn server(keys: &SeededKeyService) -> Arc<Interface> {
        Arc::new(
            Interface::new(
                InterfaceConfig::new("10.0.0.1/24")
                    .with_hostname("hub")
                    .with_endpoint("vpn.example.com")
                    .with_private_key(key(1))
                    .with_public_key(key(2)),
                keys,
            )
            .expect("server"),
        )
    }

    fn client(keys: &SeededKeyService) -> Arc<Interface> {
        Arc::new(
            Interface::new(
                InterfaceConfig::new("10.0.0.2")
                    .with_hostname("laptop")
                    .with_private_key(key(3))
                    .with_public_key(key(4)),
                keys,
            )
            .expect("client"),
        )
    }

    #[test_case("PublicKey", "public-key")]
    #[test_case("PrivateKey", "private-key")]
    #[test_case("PresharedKey", "preshared-key")]
    #[test_case("PersistentKeepalive", "persistent-keepalive")]
    fn kebab_case_conversion(input: &str, expected: &str) {
        assert_eq!(kebab_case(input), expected);
    }

    #[test]
    fn interface_commands_with_explicit_name() {
        let keys = SeededKeyService::new();
        let iface = Interface::new(
            InterfaceConfig::new("10.0.0.1/24")
                .with_interface_name("wg-office")
                .with_private_key(key(1))
                .with_public_key(key(2))
                .with_mtu(1420),
            &keys,
        )
        .expect("valid");
        let script = render_router_interface(&iface, &RouterInterfaceOptions::default());
        let lines: Vec<_> = script.lines().collect();
        assert_eq!(
            lines,
            vec![
                format!(
                    "/interface/wireguard/add name=wg-office mtu=1420 private-key=\"{}\" listen-port=51820",
                    key(1)
                )
                .as_str(),
                "/ip/address/add interface=wg-office address=10.0.0.1/24",
                "/ip/firewall/filter/add chain=input action=accept protocol=udp dst-port=51820 comment=\"Wireguard wg-office Listen Port\"",
                "/ipv6/firewall/filter/add chain=input action=accept protocol=udp dst-port=51820 comment=\"Wireguard wg-office Listen Port\"",
            ]
        );
    }

    #[test]
    fn interface_comment_and_disabled_tokens() {
        let keys = SeededKeyService::new();
        let iface = server(&keys);
        let options = RouterInterfaceOptions {
            comment: Some("site link".into()),
            disabled: true,
            firewall_rules: false,
        };
        let script = render_router_interface(&iface, &options);
        let first = script.lines().next().unwrap_or_default();
        let name = iface.router_interface_name();
        assert_eq!(
            first,
            format!(
                "/interface/wireguard/add name={name} comment=\"site link\" disabled=yes private-key=\"{}\" listen-port=51820",
                key(1)
            )
        );
        assert_eq!(script.lines().count(), 2);
    }

    #[test]
    fn derived_name_is_stable_across_renders() {
        let keys = SeededKeyService::new();
        let iface = Interface::new(InterfaceConfig::new("10.0.0.1/24"), &keys).expect("valid");
        let first = render_router_interface(&iface, &RouterInterfaceOptions::default());
        let second = render_router_interface(&iface, &RouterInterfaceOptions::default());
        assert_eq!(first, second);
        let name = iface.interface_name().expect("memoized").to_string();
        assert!(Regex::new(r"^wg-tunnel-[A-Za-z0-9]{4}$").expect("regex").is_match(&name));
        assert!(first.contains(&format!("name={name} ")));
    }

    #[test]
    fn client_peer_routes_local_address_and_ipv6() {
        let keys = SeededKeyService::new();
        let hub = server(&keys);
        hub.assign_interface_name("wg-hub").expect("name");
        let laptop = client(&keys);
        let peer = Peer::new(
            laptop,
            hub,
            PeerOptions::new("0.0.0.0/0, ::/0")
                .with_persistent_keepalive(Some(25))
                .with_preshared_key(PresharedKey::from_bytes_array([9; KEY_SIZE])),
        )
        .expect("peer");
        let psk = PresharedKey::from_bytes_array([9; KEY_SIZE]).to_base64();
        assert_eq!(
            render_router_peer(&peer, &RouterPeerOptions::default()),
            format!(
                "/interface/wireguard/peers/add interface=wg-hub comment=\"laptop\" public-key=\"{}\" private-key=\"{}\" preshared-key=\"{psk}\" persistent-keepalive=\"25\" allowed-address=\"10.0.0.2,::/0\"",
                key(2),
                key(3)
            )
        );
    }

    #[test]
    fn client_peer_without_ipv6_default_route() {
        let keys = SeededKeyService::new();
        let hub = server(&keys);
        let peer = Peer::new(client(&keys), hub, PeerOptions::new("0.0.0.0/0")).expect("peer");
        let options = RouterPeerOptions {
            client: true,
            allow_all_ipv6: false,
        };
        let rendered = render_router_peer(&peer, &options);
        assert!(rendered.ends_with(" allowed-address=\"10.0.0.2\""));
        assert!(!rendered.contains("preshared-key"));
        assert!(!rendered.contains("persistent-keepalive"));
    }

    #[test]
    fn server_peer_uses_allowed_ips_and_endpoint() {
        let keys = SeededKeyService::new();
        let hub = server(&keys);
        let laptop = client(&keys);
        laptop.assign_interface_name("wg-laptop").expect("name");
        let peer = Peer::new(laptop, hub, PeerOptions::new("10.0.0.0/24")).expect("peer");
        let options = RouterPeerOptions {
            client: false,
            allow_all_ipv6: true,
        };
        let rendered = render_router_peer(&peer, &options);
        assert!(rendered.starts_with("/interface/wireguard/peers/add interface="));
        assert!(rendered.ends_with(
            " allowed-address=\"10.0.0.0/24\" endpoint-address=\"vpn.example.com:51820\""
        ));
    }

    #[test]
    fn server_peer_omits_missing_endpoint() {
        let keys = SeededKeyService::new();
        let hub = server(&keys);
        let peer = Peer::new(hub, client(&keys), PeerOptions::new("10.0.0.2")).expect("peer");
        let options = RouterPeerOptions {
            client: false,
            allow_all_ipv6: true,
        };
        let rendered = render_router_peer(&peer, &options);
        assert!(rendered.ends_with(" allowed-address=\"10.0.0.2\""));
        assert!(!rendered.contains("endpoint-address"));
    }

    #[test]
    fn script_is_interface_then_peers() {
        let keys = SeededKeyService::new();
        let hub = server(&keys);
        let laptop = client(&keys);
        let peer = Peer::new(hub.clone(), laptop, PeerOptions::new("10.0.0.2")).expect("peer");
        let config = ConfigFile::single(hub.clone(), peer);
        let script = render_router_script(
            &config,
            &RouterInterfaceOptions::default(),
            &RouterPeerOptions::default(),
        );
        let lines: Vec<_> = script.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("/interface/wireguard/add "));
        assert!(lines[4].starts_with("/interface/wireguard/peers/add "));
    }
}
