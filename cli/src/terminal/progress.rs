use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use cidr2ip_common::network::family::AddressFamily;
use cidr2ip_core::cache::ArtifactSummary;
use cidr2ip_core::progress::ExpansionObserver;
use colored::*;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

static MULTI: OnceLock<MultiProgress> = OnceLock::new();

fn multi() -> &'static MultiProgress {
    MULTI.get_or_init(|| MultiProgress::with_draw_target(ProgressDrawTarget::stderr()))
}

/// Log sink that draws above any active bar instead of through it.
pub struct ProgressWriter;

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        multi().suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

const SYNC_TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Spinner while the repository syncs, then one bar per country.
pub struct ProgressReporter {
    quiet: u8,
    spinner: Option<ProgressBar>,
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(quiet: u8) -> Self {
        Self {
            quiet,
            spinner: None,
            bar: None,
        }
    }

    fn hidden(&self) -> bool {
        self.quiet >= 2
    }

    pub fn start_sync(&mut self, remote: &str) {
        if self.hidden() {
            return;
        }

        let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SYNC_TICKS);

        let pb = multi().add(ProgressBar::new_spinner());
        pb.set_style(style);
        pb.set_message(format!("Syncing with {}", remote.italic()));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn stop_sync(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    pub fn clear(&mut self) {
        self.stop_sync();
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}

impl ExpansionObserver for ProgressReporter {
    fn started(&mut self, country: &str, family: AddressFamily, records: usize) {
        self.stop_sync();
        if self.hidden() {
            return;
        }

        let style = ProgressStyle::with_template(
            "{prefix:.green.bold} [{bar:32.cyan/blue}] {pos}/{len} blocks {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");

        let pb = multi().add(ProgressBar::new(records as u64));
        pb.set_style(style);
        pb.set_prefix(format!("{} {}", country.to_uppercase(), family));
        self.bar = Some(pb);
    }

    fn record_done(&mut self, cidr: &str, _addresses: Option<u128>) {
        if let Some(pb) = &self.bar {
            pb.set_message(cidr.to_string());
            pb.inc(1);
        }
    }

    fn finished(&mut self, _summary: &ArtifactSummary) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.clear();
    }
}
