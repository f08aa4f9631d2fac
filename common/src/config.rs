use std::path::PathBuf;

use crate::network::family::AddressFamily;

pub const DEFAULT_COUNTRY: &str = "au";
pub const DEFAULT_REPO_DIR: &str = "country-ip-blocks";
pub const REMOTE_URL_HTTPS: &str = "https://github.com/herrbischoff/country-ip-blocks.git";
pub const REMOTE_URL_SSH: &str = "git@github.com:herrbischoff/country-ip-blocks.git";

/// Every IPv4 network fits; IPv6 networks shorter than /96 do not.
pub const DEFAULT_MAX_HOST_BITS: u8 = 32;

/// Options for a single invocation.
///
/// Built once from the command line and handed to each component by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Country codes to expand, processed in this order.
    pub countries: Vec<String>,
    /// Skips the update check and expands even when nothing changed upstream.
    pub rerun: bool,
    pub family: AddressFamily,
    /// Local working copy of the block lists.
    pub repo_dir: PathBuf,
    pub remote_url: String,
    /// Branch to track. `None` follows whatever the working copy has checked out.
    pub branch: Option<String>,
    /// Where `<code>.data.json` artifacts are written.
    pub output_dir: PathBuf,
    /// Largest number of host bits a single block may expand to.
    pub max_host_bits: u8,
    pub quiet: u8,
    pub no_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            countries: vec![DEFAULT_COUNTRY.to_string()],
            rerun: false,
            family: AddressFamily::Ipv4,
            repo_dir: PathBuf::from(DEFAULT_REPO_DIR),
            remote_url: REMOTE_URL_HTTPS.to_string(),
            branch: None,
            output_dir: PathBuf::from("."),
            max_host_bits: DEFAULT_MAX_HOST_BITS,
            quiet: 0,
            no_banner: false,
        }
    }
}
