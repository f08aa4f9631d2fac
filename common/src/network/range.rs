//! # Address Ranges
//!
//! Continuous, inclusive ranges of IPv4 and IPv6 addresses.
//!
//! Ranges never materialise their members: [`AddressRange::addresses`] hands
//! out a lazy iterator that walks the range in ascending numeric order, so a
//! `/8` costs the same amount of memory as a `/32`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::RangeInclusive;

/// Represents a continuous range of IPv4 addresses, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone {
        self.bounds().map(Ipv4Addr::from)
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.bounds().contains(&u32::from(addr))
    }

    fn bounds(&self) -> RangeInclusive<u32> {
        u32::from(self.start_addr)..=u32::from(self.end_addr)
    }
}

/// Represents a continuous range of IPv6 addresses, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Range {
    pub start_addr: Ipv6Addr,
    pub end_addr: Ipv6Addr,
}

impl Ipv6Range {
    pub fn new(start_addr: Ipv6Addr, end_addr: Ipv6Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv6Addr> + Clone {
        self.bounds().map(Ipv6Addr::from)
    }

    pub fn contains(&self, addr: Ipv6Addr) -> bool {
        self.bounds().contains(&u128::from(addr))
    }

    fn bounds(&self) -> RangeInclusive<u128> {
        u128::from(self.start_addr)..=u128::from(self.end_addr)
    }
}

/// A range of either family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressRange {
    V4(Ipv4Range),
    V6(Ipv6Range),
}

impl AddressRange {
    pub fn start(&self) -> IpAddr {
        match self {
            AddressRange::V4(range) => IpAddr::V4(range.start_addr),
            AddressRange::V6(range) => IpAddr::V6(range.start_addr),
        }
    }

    pub fn end(&self) -> IpAddr {
        match self {
            AddressRange::V4(range) => IpAddr::V4(range.end_addr),
            AddressRange::V6(range) => IpAddr::V6(range.end_addr),
        }
    }

    /// Lazily yields every address of the range, lowest first.
    ///
    /// The iterator is cheap to create, so callers that need a second pass
    /// simply ask for a new one.
    pub fn addresses(&self) -> Addresses {
        match self {
            AddressRange::V4(range) => Addresses::V4(range.bounds()),
            AddressRange::V6(range) => Addresses::V6(range.bounds()),
        }
    }

    /// Membership test. An address of the other family is never contained.
    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self, addr) {
            (AddressRange::V4(range), IpAddr::V4(addr)) => range.contains(addr),
            (AddressRange::V6(range), IpAddr::V6(addr)) => range.contains(addr),
            _ => false,
        }
    }
}

/// Lazy iterator over the members of an [`AddressRange`].
#[derive(Debug, Clone)]
pub enum Addresses {
    V4(RangeInclusive<u32>),
    V6(RangeInclusive<u128>),
}

impl Iterator for Addresses {
    type Item = IpAddr;

    fn next(&mut self) -> Option<IpAddr> {
        match self {
            Addresses::V4(inner) => inner.next().map(|n| IpAddr::V4(Ipv4Addr::from(n))),
            Addresses::V6(inner) => inner.next().map(|n| IpAddr::V6(Ipv6Addr::from(n))),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Addresses::V4(inner) => inner.size_hint(),
            Addresses::V6(inner) => inner.size_hint(),
        }
    }
}

impl DoubleEndedIterator for Addresses {
    fn next_back(&mut self) -> Option<IpAddr> {
        match self {
            Addresses::V4(inner) => inner.next_back().map(|n| IpAddr::V4(Ipv4Addr::from(n))),
            Addresses::V6(inner) => inner.next_back().map(|n| IpAddr::V6(Ipv6Addr::from(n))),
        }
    }
}

/// Creates the range covered by an IPv4 network (e.g., 192.168.1.0/24).
///
/// Host bits of `ip` are masked off. `prefix` must already be validated
/// to be at most 32.
pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> Ipv4Range {
    let ip_u32 = u32::from(ip);
    let mask = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix.min(32)))
    };
    let network = ip_u32 & mask;
    let broadcast = network | !mask;
    Ipv4Range::new(Ipv4Addr::from(network), Ipv4Addr::from(broadcast))
}

/// IPv6 counterpart of [`cidr_range`]. `prefix` must be at most 128.
pub fn cidr_range_v6(ip: Ipv6Addr, prefix: u8) -> Ipv6Range {
    let ip_u128 = u128::from(ip);
    let mask = if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(prefix.min(128)))
    };
    let network = ip_u128 & mask;
    let last = network | !mask;
    Ipv6Range::new(Ipv6Addr::from(network), Ipv6Addr::from(last))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
