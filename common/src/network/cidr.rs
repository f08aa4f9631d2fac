//! # CIDR Blocks
//!
//! Parses one line of a country block list into a [`CidrBlock`].
//!
//! Parsing is strict: the prefix must be plain decimal digits within the
//! family's width, the address must belong to the requested family and no
//! host bits may be set (`1.2.3.4/24` is rejected, `1.2.3.0/24` is not).
//! A bare address is accepted as a full-length network.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use thiserror::Error;

use crate::network::family::AddressFamily;
use crate::network::range::{self, AddressRange, Addresses};

/// Reasons a line is not a valid network for the requested family.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrParseError {
    #[error("empty network")]
    Empty,

    #[error("'{text}' is not a valid {family} address")]
    InvalidAddress { family: AddressFamily, text: String },

    #[error("expected an {expected} network, found an {found} address")]
    WrongFamily {
        expected: AddressFamily,
        found: AddressFamily,
    },

    #[error("'{0}' is not a valid prefix length")]
    InvalidPrefix(String),

    #[error("prefix length {prefix} exceeds {max}")]
    PrefixTooLong { prefix: u8, max: u8 },

    #[error("{addr}/{prefix} has host bits set")]
    HostBitsSet { addr: IpAddr, prefix: u8 },
}

/// A parsed network, keyed by the exact text it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CidrBlock {
    text: String,
    prefix: u8,
    range: AddressRange,
}

impl CidrBlock {
    /// Parses `text` (already trimmed) as a network of `family`.
    pub fn parse(text: &str, family: AddressFamily) -> Result<Self, CidrParseError> {
        if text.is_empty() {
            return Err(CidrParseError::Empty);
        }

        let (addr_str, prefix_str) = match text.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (text, None),
        };

        let addr = parse_addr(addr_str, family)?;
        let prefix = match prefix_str {
            Some(prefix_str) => parse_prefix(prefix_str, family)?,
            None => family.bits(),
        };

        let range = match addr {
            IpAddr::V4(v4) => AddressRange::V4(range::cidr_range(v4, prefix)),
            IpAddr::V6(v6) => AddressRange::V6(range::cidr_range_v6(v6, prefix)),
        };

        if range.start() != addr {
            return Err(CidrParseError::HostBitsSet { addr, prefix });
        }

        Ok(Self {
            text: text.to_string(),
            prefix,
            range,
        })
    }

    /// The text the block was parsed from. Used as the artifact key.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn family(&self) -> AddressFamily {
        match self.range {
            AddressRange::V4(_) => AddressFamily::Ipv4,
            AddressRange::V6(_) => AddressFamily::Ipv6,
        }
    }

    /// Number of bits left for hosts; the block holds `2^host_bits` addresses.
    pub fn host_bits(&self) -> u8 {
        self.family().bits() - self.prefix
    }

    /// Number of addresses in the block, `None` for the whole IPv6 space.
    pub fn size(&self) -> Option<u128> {
        1u128.checked_shl(u32::from(self.host_bits()))
    }

    pub fn network(&self) -> IpAddr {
        self.range.start()
    }

    pub fn range(&self) -> &AddressRange {
        &self.range
    }

    /// Every address of the block, network and last address included.
    pub fn addresses(&self) -> Addresses {
        self.range.addresses()
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        self.range.contains(addr)
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn parse_addr(s: &str, family: AddressFamily) -> Result<IpAddr, CidrParseError> {
    let parsed = match family {
        AddressFamily::Ipv4 => s.parse::<Ipv4Addr>().map(IpAddr::V4),
        AddressFamily::Ipv6 => s.parse::<Ipv6Addr>().map(IpAddr::V6),
    };

    parsed.map_err(|_| match s.parse::<IpAddr>() {
        Ok(other) => CidrParseError::WrongFamily {
            expected: family,
            found: family_of(other),
        },
        Err(_) => CidrParseError::InvalidAddress {
            family,
            text: s.to_string(),
        },
    })
}

fn parse_prefix(s: &str, family: AddressFamily) -> Result<u8, CidrParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CidrParseError::InvalidPrefix(s.to_string()));
    }

    let prefix = s
        .parse::<u8>()
        .map_err(|_| CidrParseError::InvalidPrefix(s.to_string()))?;

    if prefix > family.bits() {
        return Err(CidrParseError::PrefixTooLong {
            prefix,
            max: family.bits(),
        });
    }

    Ok(prefix)
}

fn family_of(addr: IpAddr) -> AddressFamily {
    match addr {
        IpAddr::V4(_) => AddressFamily::Ipv4,
        IpAddr::V6(_) => AddressFamily::Ipv6,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
