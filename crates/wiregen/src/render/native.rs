//! `wg-quick` config file rendering.
//!
//! ```text
//! [Interface]
//! # Hostname = hub
//! # PublicKey = ...
//! PrivateKey = ...
//! Address = 10.0.0.1/24
//! ListenPort = 51820
//!
//! [Peer]
//! # Name = laptop
//! # Peer IP = 10.0.0.2
//! PublicKey = ...
//! AllowedIPs = 10.0.0.2
//! ```

use std::fmt::{self, Write as FmtWrite};

use super::{number, text, Field};
use crate::config_file::ConfigFile;
use crate::interface::Interface;
use crate::peer::Peer;

const INTERFACE_COMMENTS: &[Field<Interface>] = &[
    ("Hostname", |i| text(i.hostname())),
    ("Endpoint", |i| text(i.endpoint())),
    ("InterfaceName", |i| text(i.interface_name())),
    ("PublicKey", |i| Some(i.public_key().to_base64())),
];

const INTERFACE_FIELDS: &[Field<Interface>] = &[
    ("PrivateKey", |i| Some(i.private_key().to_base64())),
    ("Address", |i| text(Some(i.address()))),
    ("ListenPort", |i| number(Some(i.listen_port()))),
    ("DNS", |i| text(i.dns())),
    ("Table", |i| number(i.table())),
    ("MTU", |i| number(i.mtu())),
    ("PreUp", |i| text(i.pre_up())),
    ("PostUp", |i| text(i.post_up())),
    ("PreDown", |i| text(i.pre_down())),
    ("PostDown", |i| text(i.post_down())),
];

const PEER_COMMENTS: &[Field<Peer>] = &[
    ("Name", |p| text(p.name())),
    ("Peer IP", |p| text(Some(p.peer_ip()))),
];

const PEER_FIELDS: &[Field<Peer>] = &[
    ("PublicKey", |p| Some(p.public_key().to_base64())),
    ("AllowedIPs", |p| text(Some(p.allowed_ips()))),
    ("Endpoint", |p| text(p.endpoint())),
    ("PresharedKey", |p| p.preshared_key().map(|k| k.to_base64())),
    ("PersistentKeepalive", |p| number(p.persistent_keepalive())),
];

fn write_section<T>(
    f: &mut fmt::Formatter<'_>,
    header: &str,
    item: &T,
    comments: &[Field<T>],
    fields: &[Field<T>],
) -> fmt::Result {
    f.write_str(header)?;
    for (label, get) in comments {
        if let Some(value) = get(item) {
            write!(f, "\n# {label} = {value}")?;
        }
    }
    for (label, get) in fields {
        if let Some(value) = get(item) {
            write!(f, "\n{label} = {value}")?;
        }
    }
    Ok(())
}

impl fmt::Display for Interface {
    /// The `[Interface]` section, without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_section(f, "[Interface]", self, INTERFACE_COMMENTS, INTERFACE_FIELDS)
    }
}

impl fmt::Display for Peer {
    /// The `[Peer]` section, without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_section(f, "[Peer]", self, PEER_COMMENTS, PEER_FIELDS)
    }
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.interface())?;
        for peer in self.peers() {
            write!(f, "\n{peer}\n")?;
        }
        Ok(())
    }
}

/// Renders a whole config file: the interface section, then each peer
/// section, every section followed by a blank line separator.
#[must_use]
pub fn render_native(config: &ConfigFile) -> String {
    let mut out = String::new();
    let _ = write!(out, "{config}");
    out
}
