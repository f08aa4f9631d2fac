use std::fs;
use std::path::{Path, PathBuf};

use cidr2ip_common::config::Config;
use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

/// A throwaway upstream repository laid out like the real block-list source.
pub struct Upstream {
    dir: TempDir,
    repo: Repository,
}

impl Upstream {
    pub fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let repo = Repository::init(dir.path())?;
        Ok(Self { dir, repo })
    }

    pub fn url(&self) -> String {
        self.dir.path().display().to_string()
    }

    pub fn commit(&self, message: &str, files: &[(&str, &str)]) -> anyhow::Result<Oid> {
        commit(&self.repo, message, files)
    }

    /// Creates `name` at the current tip without checking it out.
    pub fn branch(&self, name: &str) -> anyhow::Result<()> {
        let tip = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(name, &tip, false)?;
        Ok(())
    }
}

/// Writes `files` (relative path, content) into the working tree of `repo`
/// and commits them on the current branch.
pub fn commit(repo: &Repository, message: &str, files: &[(&str, &str)]) -> anyhow::Result<Oid> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| anyhow::anyhow!("bare repository"))?;
    let mut index = repo.index()?;
    for (rel, body) in files {
        let full = workdir.join(rel);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, body)?;
        index.add_path(Path::new(rel))?;
    }
    index.write()?;

    let tree = repo.find_tree(index.write_tree()?)?;
    let sig = Signature::now("cidr2ip", "cidr2ip@example.invalid")?;
    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None,
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    Ok(repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?)
}

/// Scratch space for a run: a not-yet-cloned working copy and an output directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn repo_dir(&self) -> PathBuf {
        self.dir.path().join("country-ip-blocks")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn config(&self, upstream: &Upstream, countries: &[&str], rerun: bool) -> Config {
        Config {
            countries: countries.iter().map(|c| c.to_string()).collect(),
            rerun,
            repo_dir: self.repo_dir(),
            remote_url: upstream.url(),
            output_dir: self.output_dir(),
            quiet: 2,
            no_banner: true,
            ..Config::default()
        }
    }
}
