//! # Repository Synchronizer
//!
//! The boundary between the pipeline and version control.
//!
//! The pipeline only needs two things from the data source: a working copy
//! on disk, and a way to learn whether that copy just changed. Both are
//! captured by [`SourceRepository`], so the git implementation in [`git`]
//! can be swapped for a fake in tests.

use std::path::Path;

use crate::error::Result;

pub mod git;

pub use git::GitRepository;

/// Outcome of an update check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Local tip already matches the remote tip; nothing was pulled.
    UpToDate,
    /// Tips differed and the local copy now matches the remote.
    Updated,
}

/// Contract for keeping a local copy of the block lists.
pub trait SourceRepository {
    /// Makes sure the working copy exists, cloning it when absent.
    fn ensure_local(&mut self) -> Result<()>;

    /// Fetches the remote, compares tips and pulls when they differ.
    fn check_and_pull(&mut self) -> Result<SyncStatus>;

    /// Root of the working copy.
    fn workdir(&self) -> &Path;
}
