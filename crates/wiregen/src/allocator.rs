//! Host address allocation for bulk provisioning.
//!
//! The allocator hands out every usable host address of a subnet exactly
//! once, lowest first, skipping the address already held by the server.
//! The order is fixed so that a given roster always produces the same
//! configs.

use std::net::Ipv4Addr;

use ipnet::{IpNet, Ipv4Net};

use crate::error::{Result, WiregenError};

/// Ascending, non-repeating allocator over the hosts of an IPv4 subnet.
#[derive(Debug, Clone)]
pub struct AddressAllocator {
    subnet: Ipv4Net,
    reserved: Ipv4Addr,
    /// Next candidate; `u64` so the cursor can step past 255.255.255.255.
    next: u64,
    last: u32,
}

impl AddressAllocator {
    /// Creates an allocator over `subnet`, never issuing `reserved`.
    ///
    /// Network and broadcast addresses are excluded for prefixes shorter
    /// than /31. A /31 yields both of its addresses and a /32 its only one.
    #[must_use]
    pub fn new(subnet: Ipv4Net, reserved: Ipv4Addr) -> Self {
        let subnet = subnet.trunc();
        let network = u32::from(subnet.network());
        let broadcast = u32::from(subnet.broadcast());
        let (first, last) = match subnet.prefix_len() {
            31 | 32 => (network, broadcast),
            _ => (network + 1, broadcast - 1),
        };
        Self {
            subnet,
            reserved,
            next: u64::from(first),
            last,
        }
    }

    /// Creates an allocator from an interface address such as `10.0.0.1/24`.
    ///
    /// The subnet is taken non-strictly from the address and the address
    /// itself is reserved. When the value lists several addresses the first
    /// one is used.
    ///
    /// # Errors
    ///
    /// Returns [`WiregenError::InvalidCidr`] if the first address is not an
    /// IPv4 address in CIDR notation.
    pub fn for_interface_address(address: &str) -> Result<Self> {
        let first = address.split(',').next().unwrap_or_default().trim();
        let net = first
            .parse::<IpNet>()
            .map_err(|e| WiregenError::InvalidCidr(format!("{first}: {e}")))?;
        match net {
            IpNet::V4(v4) => Ok(Self::new(v4, v4.addr())),
            IpNet::V6(_) => Err(WiregenError::InvalidCidr(format!(
                "{first}: only IPv4 subnets can be allocated from"
            ))),
        }
    }

    /// The subnet being allocated from.
    #[must_use]
    pub const fn subnet(&self) -> Ipv4Net {
        self.subnet
    }

    /// Takes the lowest address still in the pool.
    ///
    /// # Errors
    ///
    /// Returns [`WiregenError::PoolExhausted`] once every address is taken.
    pub fn next_address(&mut self) -> Result<Ipv4Addr> {
        while self.next <= u64::from(self.last) {
            let candidate = Ipv4Addr::from(self.next as u32);
            self.next += 1;
            if candidate != self.reserved {
                return Ok(candidate);
            }
        }
        Err(WiregenError::PoolExhausted {
            subnet: self.subnet.to_string(),
        })
    }

    /// Number of addresses still available.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        let last = u64::from(self.last);
        if self.next > last {
            return 0;
        }
        let reserved = u64::from(u32::from(self.reserved));
        let span = last - self.next + 1;
        if (self.next..=last).contains(&reserved) {
            span - 1
        } else {
            span
        }
    }
}
