//! Progress reporting hook for long expansions.
//!
//! Expansion is lazy, so the real work happens while the cache writer
//! streams addresses to disk. The writer reports through this trait after
//! every record; the CLI renders it as a progress bar.

use cidr2ip_common::network::family::AddressFamily;

use crate::cache::ArtifactSummary;

pub trait ExpansionObserver {
    /// A country is about to be written with `records` blocks.
    fn started(&mut self, _country: &str, _family: AddressFamily, _records: usize) {}

    /// One block has been fully written. `addresses` is `None` only for `::/0`.
    fn record_done(&mut self, _cidr: &str, _addresses: Option<u128>) {}

    /// The artifact for a country is on disk.
    fn finished(&mut self, _summary: &ArtifactSummary) {}
}

/// Observer that ignores every event.
pub struct Silent;

impl ExpansionObserver for Silent {}
