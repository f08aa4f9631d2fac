//! # CIDR Expander
//!
//! Reads `<base>/<family>/<country>.cidr` into a validated [`Expansion`].
//!
//! Only the parsed records are held in memory. The addresses themselves are
//! produced on demand by [`CidrBlock::addresses`] when the cache writer
//! streams them out.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use cidr2ip_common::network::cidr::CidrBlock;
use cidr2ip_common::network::family::AddressFamily;
use tracing::{debug, info};

use crate::error::{Cidr2IpError, Result};

/// The validated records of one country's block list.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub country: String,
    pub family: AddressFamily,
    pub source: PathBuf,
    pub blocks: Vec<CidrBlock>,
}

impl Expansion {
    /// Total number of addresses the blocks expand to, saturating at `u128::MAX`.
    pub fn address_count(&self) -> u128 {
        self.blocks
            .iter()
            .map(|block| block.size().unwrap_or(u128::MAX))
            .fold(0u128, u128::saturating_add)
    }
}

/// Location of a country's block list inside the data source.
pub fn cidr_path(base: &Path, family: AddressFamily, country: &str) -> PathBuf {
    base.join(family.dir_name()).join(format!("{country}.cidr"))
}

/// Lowercases a country code and rejects anything that is not plain ASCII
/// alphanumerics, so a code can never point outside the data source.
pub fn normalize_country(raw: &str) -> Result<String> {
    let code = raw.trim().to_ascii_lowercase();
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(Cidr2IpError::InvalidCountry(raw.to_string()));
    }
    Ok(code)
}

/// Reads and validates the block list of `country`.
///
/// Blank lines are skipped and a repeated network is kept once, at its first
/// position. The first malformed line aborts the whole read, as does any
/// block wider than `max_host_bits`.
pub fn read_blocks(
    base: &Path,
    country: &str,
    family: AddressFamily,
    max_host_bits: u8,
) -> Result<Expansion> {
    let path = cidr_path(base, family, country);
    let file = File::open(&path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Cidr2IpError::FileNotFound {
            country: country.to_string(),
            family,
            path: path.clone(),
        },
        _ => Cidr2IpError::Read {
            path: path.clone(),
            source,
        },
    })?;

    info!("Parsing {family} blocks for country code {}...", country.to_uppercase());
    let blocks = parse_blocks(BufReader::new(file), &path, family, max_host_bits)?;
    debug!("{} blocks read from {}", blocks.len(), path.display());

    Ok(Expansion {
        country: country.to_string(),
        family,
        source: path,
        blocks,
    })
}

fn parse_blocks<R: BufRead>(
    reader: R,
    path: &Path,
    family: AddressFamily,
    max_host_bits: u8,
) -> Result<Vec<CidrBlock>> {
    let mut blocks = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Cidr2IpError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let block = CidrBlock::parse(text, family).map_err(|source| {
            Cidr2IpError::InvalidNetworkSyntax {
                path: path.to_path_buf(),
                line: idx + 1,
                text: text.to_string(),
                family,
                source,
            }
        })?;

        if block.host_bits() > max_host_bits {
            return Err(Cidr2IpError::ExpansionTooLarge {
                cidr: text.to_string(),
                host_bits: block.host_bits(),
                limit: max_host_bits,
            });
        }

        if !seen.insert(text.to_string()) {
            debug!("Skipping repeated block {text} on line {}", idx + 1);
            continue;
        }
        blocks.push(block);
    }

    Ok(blocks)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
