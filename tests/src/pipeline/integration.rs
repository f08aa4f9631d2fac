use std::fs;

use cidr2ip_common::network::family::AddressFamily;
use cidr2ip_core::cache;
use cidr2ip_core::pipeline::{self, RunOutcome};
use cidr2ip_core::progress::Silent;
use cidr2ip_core::repository::GitRepository;
use cidr2ip_core::Cidr2IpError;

use crate::fixture::{Upstream, Workspace};

fn upstream_with_lists() -> Upstream {
    let upstream = Upstream::new().unwrap();
    upstream
        .commit(
            "initial lists",
            &[
                ("ipv4/au.cidr", "1.2.3.0/30\n1.2.3.4/32\n"),
                ("ipv4/nz.cidr", "10.0.0.0/31\n"),
                ("ipv6/au.cidr", "2001:db8::/127\n"),
            ],
        )
        .unwrap();
    upstream
}

#[test]
fn first_run_clones_then_reports_up_to_date() {
    let upstream = upstream_with_lists();
    let ws = Workspace::new().unwrap();
    let cfg = ws.config(&upstream, &["au"], false);
    let mut repo = GitRepository::from_config(&cfg);

    let outcome = pipeline::run(&cfg, &mut repo, &mut Silent).unwrap();

    assert_eq!(outcome, RunOutcome::UpToDate);
    assert!(ws.repo_dir().join("ipv4/au.cidr").exists());
    assert!(!ws.output_dir().exists());
}

#[test]
fn rerun_expands_without_upstream_change() {
    let upstream = upstream_with_lists();
    let ws = Workspace::new().unwrap();
    let cfg = ws.config(&upstream, &["au", "nz"], true);
    let mut repo = GitRepository::from_config(&cfg);

    let RunOutcome::Expanded(artifacts) = pipeline::run(&cfg, &mut repo, &mut Silent).unwrap()
    else {
        panic!("rerun must expand");
    };

    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].addresses, 5);
    assert_eq!(
        fs::read_to_string(ws.output_dir().join("au.data.json")).unwrap(),
        r#"{"1.2.3.0/30":["1.2.3.0","1.2.3.1","1.2.3.2","1.2.3.3"],"1.2.3.4/32":["1.2.3.4"]}"#
    );
    assert_eq!(
        fs::read_to_string(ws.output_dir().join("nz.data.json")).unwrap(),
        r#"{"10.0.0.0/31":["10.0.0.0","10.0.0.1"]}"#
    );
}

#[test]
fn upstream_change_triggers_expansion() {
    let upstream = upstream_with_lists();
    let ws = Workspace::new().unwrap();
    let cfg = ws.config(&upstream, &["au"], false);

    let mut repo = GitRepository::from_config(&cfg);
    assert_eq!(
        pipeline::run(&cfg, &mut repo, &mut Silent).unwrap(),
        RunOutcome::UpToDate
    );

    upstream
        .commit("replace au", &[("ipv4/au.cidr", "8.8.8.8/32\n")])
        .unwrap();

    let mut repo = GitRepository::from_config(&cfg);
    let outcome = pipeline::run(&cfg, &mut repo, &mut Silent).unwrap();
    assert!(matches!(outcome, RunOutcome::Expanded(ref a) if a.len() == 1));

    let au = cache::read_artifact(&ws.output_dir().join("au.data.json")).unwrap();
    assert_eq!(au.len(), 1);
    assert_eq!(au["8.8.8.8/32"], ["8.8.8.8"]);

    assert_eq!(
        pipeline::run(&cfg, &mut repo, &mut Silent).unwrap(),
        RunOutcome::UpToDate
    );
}

#[test]
fn ipv6_family_writes_separate_artifact() {
    let upstream = upstream_with_lists();
    let ws = Workspace::new().unwrap();
    let mut cfg = ws.config(&upstream, &["au"], true);
    cfg.family = AddressFamily::Ipv6;
    let mut repo = GitRepository::from_config(&cfg);

    pipeline::run(&cfg, &mut repo, &mut Silent).unwrap();

    let au = cache::read_artifact(&ws.output_dir().join("au.ipv6.data.json")).unwrap();
    assert_eq!(au["2001:db8::/127"], ["2001:db8::", "2001:db8::1"]);
    assert!(!ws.output_dir().join("au.data.json").exists());
}

#[test]
fn unknown_country_fails_the_run() {
    let upstream = upstream_with_lists();
    let ws = Workspace::new().unwrap();
    let cfg = ws.config(&upstream, &["zz"], true);
    let mut repo = GitRepository::from_config(&cfg);

    let err = pipeline::run(&cfg, &mut repo, &mut Silent).unwrap_err();

    assert!(matches!(err, Cidr2IpError::FileNotFound { .. }));
    assert!(!ws.output_dir().join("zz.data.json").exists());
}
