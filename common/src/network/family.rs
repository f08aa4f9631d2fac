use std::fmt;
use std::str::FromStr;

/// The two IP address families published by the country block lists.
///
/// The family selects both the sub-directory of the data source
/// (`ipv4/` or `ipv6/`) and the parser used for every line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressFamily {
    #[default]
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Name of the directory holding this family's `.cidr` files.
    pub fn dir_name(self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "ipv4",
            AddressFamily::Ipv6 => "ipv6",
        }
    }

    /// Width of an address in bits.
    pub fn bits(self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => f.write_str("IPv4"),
            AddressFamily::Ipv6 => f.write_str("IPv6"),
        }
    }
}

impl FromStr for AddressFamily {
    type Err = String;

    /// Accepts "ipv4", "v4", "4" and their IPv6 counterparts (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ipv4" | "v4" | "4" => Ok(AddressFamily::Ipv4),
            "ipv6" | "v6" | "6" => Ok(AddressFamily::Ipv6),
            _ => Err(format!("invalid address family: {s} (expected ipv4 or ipv6)")),
        }
    }
}
