//! Aligned CIDR blocks.
//!
//! An [`AddressBlock`] wraps an [`IpNet`] whose host bits are all zero. The
//! allocator does its tier arithmetic on raw `u128` addresses, so the block
//! also exposes its base and last address in that form, with the [`Family`]
//! supplying the width.

use super::error::AllocationError;
use ipnet::IpNet;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family of a block, which fixes its width in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Number of bits in an address of this family.
    pub fn width(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// Convert a raw value back into an address of this family.
    pub fn address(self, value: u128) -> IpAddr {
        match self {
            Family::V4 => IpAddr::V4(Ipv4Addr::from(value as u32)),
            Family::V6 => IpAddr::V6(Ipv6Addr::from(value)),
        }
    }
}

fn raw(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

/// A contiguous, power-of-two aligned range of addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressBlock {
    net: IpNet,
}

impl AddressBlock {
    /// Block at `base`, or `None` if the prefix does not fit the family.
    ///
    /// The caller guarantees `base` is aligned to the block size.
    pub(crate) fn aligned(family: Family, base: u128, prefix_len: u8) -> Option<Self> {
        let net = IpNet::new(family.address(base), prefix_len).ok()?;
        debug_assert_eq!(net.trunc(), net, "{} is not aligned", net);
        Some(Self { net })
    }

    /// Parse a CIDR literal such as `10.0.0.0/24` or `2001:db8::/48`.
    ///
    /// A bare address is treated as a full-width host network. Host bits
    /// set below the prefix are rejected rather than silently masked off.
    pub fn parse(literal: &str) -> Result<Self, AllocationError> {
        let literal = literal.trim();
        let invalid = |reason: String| AllocationError::InvalidNetwork {
            literal: literal.to_string(),
            reason,
        };

        let net = if literal.contains('/') {
            literal.parse::<IpNet>().map_err(|e| invalid(e.to_string()))?
        } else {
            IpNet::from(literal.parse::<IpAddr>().map_err(|e| invalid(e.to_string()))?)
        };

        if net.trunc() != net {
            return Err(invalid(format!("has host bits set, the network is {}", net.trunc())));
        }

        Ok(Self { net })
    }

    /// The underlying network
    pub fn net(&self) -> IpNet {
        self.net
    }

    pub fn family(&self) -> Family {
        match self.net {
            IpNet::V4(_) => Family::V4,
            IpNet::V6(_) => Family::V6,
        }
    }

    /// Raw value of the first address in the block.
    pub fn base(&self) -> u128 {
        raw(self.net.network())
    }

    /// Raw value of the last address in the block.
    pub fn last(&self) -> u128 {
        raw(self.net.broadcast())
    }

    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    pub fn width(&self) -> u8 {
        self.net.max_prefix_len()
    }

    /// Number of host bits, i.e. log2 of the address count.
    pub fn host_bits(&self) -> u32 {
        u32::from(self.width() - self.prefix_len())
    }

    /// The enclosing block one prefix length coarser.
    pub fn supernet(&self) -> Option<AddressBlock> {
        self.net.supernet().map(|net| AddressBlock { net })
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}
