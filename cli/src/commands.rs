pub mod expand;

use std::path::PathBuf;

use cidr2ip_common::config::{self, Config};
use cidr2ip_common::network::family::AddressFamily;
use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "cidr2ip", version)]
#[command(about = "Expand country CIDR block lists into individual IP addresses.")]
#[command(
    long_about = "Expand country CIDR block lists into individual IP addresses.\n\n\
                  Block lists come from https://github.com/herrbischoff/country-ip-blocks \
                  and are only expanded again when the upstream repository changed."
)]
pub struct CommandLine {
    /// Country codes to expand, separated by spaces (e.g. -c au us nz)
    #[arg(short = 'c', long = "country", num_args = 1.., default_value = config::DEFAULT_COUNTRY)]
    pub countries: Vec<String>,

    /// Ignore the update check and expand the given countries again
    #[arg(short, long)]
    pub rerun: bool,

    /// Address family to expand (ipv4 or ipv6)
    #[arg(long, default_value = "ipv4")]
    pub family: AddressFamily,

    /// Local working copy of the block lists
    #[arg(long, default_value = config::DEFAULT_REPO_DIR)]
    pub repo_dir: PathBuf,

    /// Remote cloned when the working copy is missing
    #[arg(long, default_value = config::REMOTE_URL_HTTPS)]
    pub remote: String,

    /// Branch to track (defaults to the checked out branch)
    #[arg(long)]
    pub branch: Option<String>,

    /// Directory the <code>.data.json artifacts are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Refuse any block that would expand to more than 2^N addresses
    #[arg(
        long,
        value_name = "N",
        default_value_t = config::DEFAULT_MAX_HOST_BITS,
        value_parser = clap::value_parser!(u8).range(0..=128)
    )]
    pub max_host_bits: u8,

    /// Print less; repeat to hide progress bars as well
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn into_config(self) -> Config {
        Config {
            countries: self.countries,
            rerun: self.rerun,
            family: self.family,
            repo_dir: self.repo_dir,
            remote_url: self.remote,
            branch: self.branch,
            output_dir: self.output_dir,
            max_host_bits: self.max_host_bits,
            quiet: self.quiet,
            no_banner: self.no_banner,
        }
    }
}
