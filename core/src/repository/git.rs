use std::path::{Path, PathBuf};

use cidr2ip_common::config::Config;
use cidr2ip_common::success;
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{Cred, CredentialType, FetchOptions, Oid, RemoteCallbacks, Repository};
use tracing::{debug, info, warn};

use crate::error::{Cidr2IpError, Result};
use crate::repository::{SourceRepository, SyncStatus};

const REMOTE_NAME: &str = "origin";
const REFLOG_MSG: &str = "cidr2ip: fast-forward";

/// [`SourceRepository`] backed by libgit2.
///
/// The repository handle is opened lazily and kept until the value is dropped.
pub struct GitRepository {
    path: PathBuf,
    url: String,
    branch: Option<String>,
    repo: Option<Repository>,
}

enum PullOutcome {
    FastForwarded,
    LocalAhead,
    Diverged,
}

impl GitRepository {
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>, branch: Option<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
            branch,
            repo: None,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.repo_dir, &cfg.remote_url, cfg.branch.clone())
    }

    fn handle(&mut self) -> Result<&Repository> {
        let repo = match self.repo.take() {
            Some(repo) => repo,
            None => self.open_or_clone()?,
        };
        Ok(&*self.repo.insert(repo))
    }

    fn open_or_clone(&self) -> Result<Repository> {
        if self.path.exists() {
            debug!("Opening working copy at {}", self.path.display());
            return Repository::open(&self.path).map_err(local_error(&self.path));
        }

        info!("Cloning {} into {}...", self.url, self.path.display());
        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options());
        if let Some(branch) = &self.branch {
            builder.branch(branch);
        }

        let repo = builder
            .clone(&self.url, &self.path)
            .map_err(|source| Cidr2IpError::SourceUnavailable {
                url: self.url.clone(),
                source,
            })?;

        success!("Cloned {}", self.url);
        Ok(repo)
    }
}

impl SourceRepository for GitRepository {
    fn ensure_local(&mut self) -> Result<()> {
        self.handle().map(|_| ())
    }

    fn check_and_pull(&mut self) -> Result<SyncStatus> {
        let url = self.url.clone();
        let path = self.path.clone();
        let configured = self.branch.clone();
        let repo = self.handle()?;

        let branch = resolve_branch(repo, configured.as_deref()).map_err(local_error(&path))?;
        debug!("Fetching {REMOTE_NAME}/{branch}");
        fetch(repo, &branch).map_err(|source| Cidr2IpError::SourceUnavailable { url, source })?;

        let switched = check_out_branch(repo, &branch).map_err(local_error(&path))?;
        let (local, remote) = tips(repo, &branch).map_err(local_error(&path))?;
        if local == remote {
            if switched {
                success!("Switched working copy to {branch} ({})", short(local));
                return Ok(SyncStatus::Updated);
            }
            info!("Up to date ({})", short(local));
            return Ok(SyncStatus::UpToDate);
        }

        info!("Upstream update detected: {} -> {}", short(local), short(remote));
        info!("Pulling from {REMOTE_NAME}/{branch}...");

        match fast_forward(repo, &branch, remote).map_err(local_error(&path))? {
            PullOutcome::FastForwarded => {
                success!("Fast-forwarded {branch} to {}", short(remote));
            }
            PullOutcome::LocalAhead => {
                warn!("Local {branch} is ahead of {REMOTE_NAME}/{branch}, nothing to pull");
            }
            PullOutcome::Diverged => return Err(Cidr2IpError::Diverged { branch }),
        }

        Ok(SyncStatus::Updated)
    }

    fn workdir(&self) -> &Path {
        &self.path
    }
}

fn local_error(path: &Path) -> impl Fn(git2::Error) -> Cidr2IpError + '_ {
    move |source| Cidr2IpError::Repository {
        path: path.to_path_buf(),
        source,
    }
}

/// Picks the branch to track: the configured one, else the checked out
/// branch, else whatever `origin/HEAD` points at.
fn resolve_branch(repo: &Repository, configured: Option<&str>) -> std::result::Result<String, git2::Error> {
    if let Some(branch) = configured {
        return Ok(branch.to_string());
    }

    if let Ok(head) = repo.head() {
        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(name.to_string());
            }
        }
    }

    let remote_head = repo.find_reference(&format!("refs/remotes/{REMOTE_NAME}/HEAD"))?;
    let prefix = format!("refs/remotes/{REMOTE_NAME}/");
    remote_head
        .symbolic_target()
        .and_then(|target| target.strip_prefix(prefix.as_str()))
        .map(str::to_string)
        .ok_or_else(|| git2::Error::from_str("cannot determine the branch to track"))
}

fn fetch(repo: &Repository, branch: &str) -> std::result::Result<(), git2::Error> {
    let mut remote = repo.find_remote(REMOTE_NAME)?;
    let refspec = format!("+refs/heads/{branch}:refs/remotes/{REMOTE_NAME}/{branch}");
    remote.fetch(&[refspec.as_str()], Some(&mut fetch_options()), None)
}

/// Points HEAD at `refs/heads/{branch}`, creating the branch from its
/// remote tracking tip when needed. Returns whether HEAD moved.
fn check_out_branch(repo: &Repository, branch: &str) -> std::result::Result<bool, git2::Error> {
    let refname = format!("refs/heads/{branch}");
    let current = repo.head().ok().and_then(|head| head.name().map(str::to_string));
    if current.as_deref() == Some(refname.as_str()) {
        return Ok(false);
    }

    if repo.find_reference(&refname).is_err() {
        let tip = repo
            .find_reference(&format!("refs/remotes/{REMOTE_NAME}/{branch}"))?
            .peel_to_commit()?;
        repo.branch(branch, &tip, false)?;
    }

    debug!("Checking out {branch}");
    repo.set_head(&refname)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
    Ok(true)
}

/// Local HEAD and remote tracking tip.
fn tips(repo: &Repository, branch: &str) -> std::result::Result<(Oid, Oid), git2::Error> {
    let local = repo.head()?.peel_to_commit()?.id();
    let remote = repo
        .find_reference(&format!("refs/remotes/{REMOTE_NAME}/{branch}"))?
        .peel_to_commit()?
        .id();
    Ok((local, remote))
}

fn fast_forward(repo: &Repository, branch: &str, target: Oid) -> std::result::Result<PullOutcome, git2::Error> {
    let annotated = repo.find_annotated_commit(target)?;
    let (analysis, _) = repo.merge_analysis(&[&annotated])?;

    if analysis.is_up_to_date() {
        return Ok(PullOutcome::LocalAhead);
    }
    if !analysis.is_fast_forward() {
        return Ok(PullOutcome::Diverged);
    }

    let refname = format!("refs/heads/{branch}");
    match repo.find_reference(&refname) {
        Ok(mut reference) => {
            reference.set_target(target, REFLOG_MSG)?;
        }
        Err(_) => {
            repo.reference(&refname, target, true, REFLOG_MSG)?;
        }
    }
    repo.set_head(&refname)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

    Ok(PullOutcome::FastForwarded)
}

/// SSH remotes authenticate through the running agent; everything else
/// uses libgit2's defaults.
fn fetch_options<'a>() -> FetchOptions<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username, allowed| {
        if allowed.contains(CredentialType::SSH_KEY) {
            Cred::ssh_key_from_agent(username.unwrap_or("git"))
        } else {
            Cred::default()
        }
    });

    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    options
}

fn short(oid: Oid) -> String {
    oid.to_string().chars().take(8).collect()
}
