use std::time::{Duration, Instant};

use colored::*;
use tracing::{info, warn};

use crate::terminal::{colors, format, print, progress::ProgressReporter};
use cidr2ip_common::config::Config;
use cidr2ip_core::cache::ArtifactSummary;
use cidr2ip_core::pipeline::{self, RunOutcome};
use cidr2ip_core::repository::GitRepository;

pub fn expand(cfg: &Config) -> anyhow::Result<()> {
    print::header("getting ready for expansion", cfg.quiet);
    print_settings(cfg);

    let start_time: Instant = Instant::now();
    let mut repo = GitRepository::from_config(cfg);
    let mut reporter = ProgressReporter::new(cfg.quiet);
    reporter.start_sync(&cfg.remote_url);

    let outcome = pipeline::run(cfg, &mut repo, &mut reporter);
    reporter.clear();

    match outcome? {
        RunOutcome::UpToDate => up_to_date(cfg),
        RunOutcome::Expanded(artifacts) => expansion_ends(&artifacts, start_time.elapsed(), cfg),
    }

    Ok(())
}

fn print_settings(cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    let keys = ["Countries", "Family", "Source", "Output"];
    let width = keys.iter().map(|k| k.len()).max().unwrap_or(0);
    print::GLOBAL_KEY_WIDTH.set(width);

    let countries = cfg.countries.join(" ").to_uppercase();
    print::aligned_line("Countries", countries.color(colors::ACCENT));
    print::aligned_line(
        "Family",
        cfg.family.to_string().color(format::family_color(cfg.family)),
    );
    print::aligned_line("Source", cfg.repo_dir.display().to_string());
    print::aligned_line("Output", cfg.output_dir.display().to_string());
    if cfg.rerun {
        warn!("Rerun requested, existing artifacts will be replaced");
    }
}

fn up_to_date(cfg: &Config) {
    print::header("nothing to do", cfg.quiet);
    info!("Block lists are up to date, no artifacts were written");
    info!("Use --rerun to expand them again anyway");
}

fn expansion_ends(artifacts: &[ArtifactSummary], total_time: Duration, cfg: &Config) {
    if cfg.quiet < 2 {
        print::header("expanded countries", cfg.quiet);
        for (idx, artifact) in artifacts.iter().enumerate() {
            if cfg.quiet == 0 {
                print::tree_head(idx, &artifact.country.to_uppercase());
                print::as_tree_one_level(format::artifact_details(artifact));
            }
        }
    }

    print_summary(artifacts, total_time, cfg);
}

fn print_summary(artifacts: &[ArtifactSummary], total_time: Duration, cfg: &Config) {
    let total: u128 = artifacts
        .iter()
        .map(|a| a.addresses)
        .fold(0u128, u128::saturating_add);

    let countries: ColoredString = format!("{} countries", artifacts.len()).bold().green();
    let addresses: ColoredString = format!("{} addresses", format::count(total)).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Expansion Complete: {countries}, {addresses} in {total_time}")
            .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
            print::end_of_program();
        }
        _ => print::success_line(&output.to_string()),
    }
}
