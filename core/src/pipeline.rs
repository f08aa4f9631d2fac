//! # Command Driver
//!
//! Sequences one invocation:
//!
//! 1. **Init**: make sure the working copy exists.
//! 2. **CheckUpdate**: fetch and compare tips, unless a rerun was requested.
//!    Nothing new upstream ends the run here without touching any file.
//! 3. **PerCountry**: expand each requested country, in the order given,
//!    and write its artifact.
//!
//! The first error aborts everything that follows it.

use cidr2ip_common::config::Config;
use tracing::info;

use crate::cache::{self, ArtifactSummary};
use crate::error::Result;
use crate::expander;
use crate::progress::ExpansionObserver;
use crate::repository::{SourceRepository, SyncStatus};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The data source had not changed; nothing was written.
    UpToDate,
    /// One artifact per requested country, in request order.
    Expanded(Vec<ArtifactSummary>),
}

pub fn run(
    cfg: &Config,
    repo: &mut dyn SourceRepository,
    observer: &mut dyn ExpansionObserver,
) -> Result<RunOutcome> {
    let countries = cfg
        .countries
        .iter()
        .map(|raw| expander::normalize_country(raw))
        .collect::<Result<Vec<String>>>()?;

    repo.ensure_local()?;

    if cfg.rerun {
        info!("Rerun requested, skipping update check");
    } else if repo.check_and_pull()? == SyncStatus::UpToDate {
        return Ok(RunOutcome::UpToDate);
    }

    let mut artifacts = Vec::with_capacity(countries.len());
    for country in &countries {
        let expansion =
            expander::read_blocks(repo.workdir(), country, cfg.family, cfg.max_host_bits)?;
        artifacts.push(cache::write_artifact(&cfg.output_dir, &expansion, observer)?);
    }

    Ok(RunOutcome::Expanded(artifacts))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
