//! # Result Cache
//!
//! Persists an [`Expansion`] as a JSON object mapping each network to the
//! ordered list of its addresses:
//!
//! ```json
//! {"1.2.3.0/30":["1.2.3.0","1.2.3.1","1.2.3.2","1.2.3.3"]}
//! ```
//!
//! Addresses are pulled from the lazy range iterators while serializing, so
//! memory use does not grow with the size of the networks. The artifact is
//! written to a temporary file next to its destination and renamed into
//! place once complete.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use cidr2ip_common::network::cidr::CidrBlock;
use cidr2ip_common::network::family::AddressFamily;
use cidr2ip_common::success;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Cidr2IpError, Result};
use crate::expander::Expansion;
use crate::progress::ExpansionObserver;

/// What was written for one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub country: String,
    pub family: AddressFamily,
    pub path: PathBuf,
    pub records: usize,
    pub addresses: u128,
}

/// `au.data.json` for IPv4, `au.ipv6.data.json` for IPv6.
pub fn artifact_name(country: &str, family: AddressFamily) -> String {
    match family {
        AddressFamily::Ipv4 => format!("{country}.data.json"),
        AddressFamily::Ipv6 => format!("{country}.ipv6.data.json"),
    }
}

pub fn artifact_path(output_dir: &Path, country: &str, family: AddressFamily) -> PathBuf {
    output_dir.join(artifact_name(country, family))
}

/// Serializes a block's addresses as a JSON array without collecting them.
struct AddressList<'a>(&'a CidrBlock);

impl Serialize for AddressList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.addresses())
    }
}

/// Writes the artifact for `expansion`, replacing any previous one.
pub fn write_artifact(
    output_dir: &Path,
    expansion: &Expansion,
    observer: &mut dyn ExpansionObserver,
) -> Result<ArtifactSummary> {
    let path = artifact_path(output_dir, &expansion.country, expansion.family);
    let fail = |source: io::Error| Cidr2IpError::Persistence {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(output_dir).map_err(fail)?;
    let tmp = NamedTempFile::new_in(output_dir).map_err(fail)?;
    debug!("Streaming {} into {}", path.display(), tmp.path().display());

    observer.started(&expansion.country, expansion.family, expansion.blocks.len());

    let mut writer = BufWriter::new(tmp);
    {
        let mut ser = serde_json::Serializer::new(&mut writer);
        let mut map = (&mut ser)
            .serialize_map(Some(expansion.blocks.len()))
            .map_err(|e| fail(e.into()))?;

        for block in &expansion.blocks {
            map.serialize_entry(block.as_str(), &AddressList(block))
                .map_err(|e| fail(e.into()))?;
            observer.record_done(block.as_str(), block.size());
        }

        map.end().map_err(|e| fail(e.into()))?;
    }
    writer.flush().map_err(fail)?;

    let tmp = writer.into_inner().map_err(|e| fail(e.into_error()))?;
    tmp.persist(&path).map_err(|e| fail(e.error))?;

    let summary = ArtifactSummary {
        country: expansion.country.clone(),
        family: expansion.family,
        path,
        records: expansion.blocks.len(),
        addresses: expansion.address_count(),
    };

    success!(
        "Wrote {} ({} blocks, {} addresses)",
        summary.path.display(),
        summary.records,
        summary.addresses
    );
    observer.finished(&summary);

    Ok(summary)
}

/// Loads an artifact back into memory.
///
/// Only sensible for small artifacts; the whole map is materialised.
pub fn read_artifact(path: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    let file = File::open(path).map_err(|source| Cidr2IpError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| Cidr2IpError::CorruptArtifact {
        path: path.to_path_buf(),
        source,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
