use std::fs;

use cidr2ip_core::Cidr2IpError;
use cidr2ip_core::repository::{GitRepository, SourceRepository, SyncStatus};
use git2::Repository;

use crate::fixture::{self, Upstream, Workspace};

const AU_V1: &str = "1.2.3.0/30\n";
const AU_V2: &str = "1.2.3.0/30\n1.2.3.4/32\n";

fn seeded_upstream() -> Upstream {
    let upstream = Upstream::new().unwrap();
    upstream.commit("initial lists", &[("ipv4/au.cidr", AU_V1)]).unwrap();
    upstream
}

#[test]
fn clones_missing_working_copy() {
    let upstream = seeded_upstream();
    let ws = Workspace::new().unwrap();
    let mut repo = GitRepository::new(ws.repo_dir(), upstream.url(), None);

    repo.ensure_local().unwrap();

    assert_eq!(repo.workdir(), ws.repo_dir());
    assert_eq!(
        fs::read_to_string(ws.repo_dir().join("ipv4/au.cidr")).unwrap(),
        AU_V1
    );
}

#[test]
fn fresh_clone_is_up_to_date() {
    let upstream = seeded_upstream();
    let ws = Workspace::new().unwrap();
    let mut repo = GitRepository::new(ws.repo_dir(), upstream.url(), None);

    repo.ensure_local().unwrap();
    assert_eq!(repo.check_and_pull().unwrap(), SyncStatus::UpToDate);
}

#[test]
fn upstream_commit_is_pulled() {
    let upstream = seeded_upstream();
    let ws = Workspace::new().unwrap();
    let mut repo = GitRepository::new(ws.repo_dir(), upstream.url(), None);
    repo.ensure_local().unwrap();

    upstream.commit("add block", &[("ipv4/au.cidr", AU_V2)]).unwrap();

    assert_eq!(repo.check_and_pull().unwrap(), SyncStatus::Updated);
    assert_eq!(
        fs::read_to_string(ws.repo_dir().join("ipv4/au.cidr")).unwrap(),
        AU_V2
    );
    assert_eq!(repo.check_and_pull().unwrap(), SyncStatus::UpToDate);
}

#[test]
fn reopens_existing_working_copy() {
    let upstream = seeded_upstream();
    let ws = Workspace::new().unwrap();
    GitRepository::new(ws.repo_dir(), upstream.url(), None)
        .ensure_local()
        .unwrap();

    upstream.commit("add block", &[("ipv4/au.cidr", AU_V2)]).unwrap();

    let mut reopened = GitRepository::new(ws.repo_dir(), upstream.url(), None);
    reopened.ensure_local().unwrap();
    assert_eq!(reopened.check_and_pull().unwrap(), SyncStatus::Updated);
}

#[test]
fn local_commits_count_as_update() {
    let upstream = seeded_upstream();
    let ws = Workspace::new().unwrap();
    let mut repo = GitRepository::new(ws.repo_dir(), upstream.url(), None);
    repo.ensure_local().unwrap();

    let local = Repository::open(ws.repo_dir()).unwrap();
    fixture::commit(&local, "local edit", &[("ipv4/nz.cidr", "10.0.0.0/31\n")]).unwrap();

    assert_eq!(repo.check_and_pull().unwrap(), SyncStatus::Updated);
    assert!(ws.repo_dir().join("ipv4/nz.cidr").exists());
}

#[test]
fn diverged_history_is_refused() {
    let upstream = seeded_upstream();
    let ws = Workspace::new().unwrap();
    let mut repo = GitRepository::new(ws.repo_dir(), upstream.url(), None);
    repo.ensure_local().unwrap();

    let local = Repository::open(ws.repo_dir()).unwrap();
    fixture::commit(&local, "local edit", &[("ipv4/nz.cidr", "10.0.0.0/31\n")]).unwrap();
    upstream.commit("upstream edit", &[("ipv4/au.cidr", AU_V2)]).unwrap();

    assert!(matches!(
        repo.check_and_pull(),
        Err(Cidr2IpError::Diverged { .. })
    ));
}

#[test]
fn unreachable_remote_is_source_unavailable() {
    let ws = Workspace::new().unwrap();
    let missing = ws.repo_dir().with_file_name("no-such-upstream");
    let mut repo = GitRepository::new(ws.repo_dir(), missing.display().to_string(), None);

    assert!(matches!(
        repo.ensure_local(),
        Err(Cidr2IpError::SourceUnavailable { .. })
    ));
}

#[test]
fn configured_branch_is_checked_out() {
    let upstream = seeded_upstream();
    upstream.branch("dev").unwrap();
    upstream.commit("add block", &[("ipv4/au.cidr", AU_V2)]).unwrap();

    let ws = Workspace::new().unwrap();
    GitRepository::new(ws.repo_dir(), upstream.url(), None)
        .ensure_local()
        .unwrap();

    let mut repo = GitRepository::new(ws.repo_dir(), upstream.url(), Some("dev".to_string()));
    assert_eq!(repo.check_and_pull().unwrap(), SyncStatus::Updated);

    let local = Repository::open(ws.repo_dir()).unwrap();
    assert_eq!(local.head().unwrap().shorthand(), Some("dev"));
    assert_eq!(
        fs::read_to_string(ws.repo_dir().join("ipv4/au.cidr")).unwrap(),
        AU_V1
    );
    assert_eq!(repo.check_and_pull().unwrap(), SyncStatus::UpToDate);
}

#[test]
fn lost_remote_on_fetch_is_source_unavailable() {
    let upstream = seeded_upstream();
    let ws = Workspace::new().unwrap();
    let mut repo = GitRepository::new(ws.repo_dir(), upstream.url(), None);
    repo.ensure_local().unwrap();

    drop(upstream);

    assert!(matches!(
        repo.check_and_pull(),
        Err(Cidr2IpError::SourceUnavailable { .. })
    ));
}
