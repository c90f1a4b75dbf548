//! Private address space classification
//!
//! Ingress sources are either inside the RFC 1918 ranges (private) or
//! anywhere else (public). Anything that does not parse as an IPv4 address
//! or IPv4 CIDR block is treated as public.

use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 network block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Block {
    base: u32,
    prefix: u8,
}

/// Reserved private ranges (10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16)
pub const PRIVATE_RANGES: [Ipv4Block; 3] = [
    Ipv4Block::from_octets([10, 0, 0, 0], 8),
    Ipv4Block::from_octets([172, 16, 0, 0], 12),
    Ipv4Block::from_octets([192, 168, 0, 0], 16),
];

impl Ipv4Block {
    const fn from_octets(octets: [u8; 4], prefix: u8) -> Self {
        Ipv4Block {
            base: u32::from_be_bytes(octets) & mask(prefix),
            prefix,
        }
    }

    /// Parse `a.b.c.d` (a /32 block) or `a.b.c.d/n`
    ///
    /// Host bits below the prefix are dropped, so `10.1.2.3/8` is `10.0.0.0/8`.
    pub fn parse(input: &str) -> Option<Self> {
        let (address, prefix) = match input.split_once('/') {
            Some((address, prefix)) => (address, prefix.parse::<u8>().ok()?),
            None => (input, 32),
        };
        if prefix > 32 {
            return None;
        }
        let address = Ipv4Addr::from_str(address).ok()?;
        Some(Self::from_octets(address.octets(), prefix))
    }

    /// True if every address of `other` lies inside this block
    pub fn contains(&self, other: &Ipv4Block) -> bool {
        other.prefix >= self.prefix && (other.base & mask(self.prefix)) == self.base
    }
}

const fn mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix as u32)
    }
}

/// True iff the address or block is wholly inside one of the private ranges
pub fn is_private(address_or_block: &str) -> bool {
    match Ipv4Block::parse(address_or_block.trim()) {
        Some(block) => PRIVATE_RANGES.iter().any(|range| range.contains(&block)),
        None => false,
    }
}
