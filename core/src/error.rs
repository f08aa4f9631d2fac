use std::io;
use std::path::PathBuf;

use cidr2ip_common::network::cidr::CidrParseError;
use cidr2ip_common::network::family::AddressFamily;
use thiserror::Error;

/// Result type alias for cidr2ip operations
pub type Result<T> = std::result::Result<T, Cidr2IpError>;

/// Everything that can abort a run.
#[derive(Error, Debug)]
pub enum Cidr2IpError {
    /// Clone or fetch from the remote failed (network, auth, unknown branch)
    #[error("source repository {url} is unavailable: {source}")]
    SourceUnavailable {
        url: String,
        #[source]
        source: git2::Error,
    },

    /// The local working copy exists but cannot be used
    #[error("local repository at {} is unusable: {source}", path.display())]
    Repository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// Local and remote histories cannot be fast-forwarded
    #[error("cannot fast-forward '{branch}': local and remote histories have diverged")]
    Diverged { branch: String },

    /// A line of a CIDR file is not a network of the expected family
    #[error("invalid {family} network '{text}' at {}:{line}: {source}", path.display())]
    InvalidNetworkSyntax {
        path: PathBuf,
        line: usize,
        text: String,
        family: AddressFamily,
        #[source]
        source: CidrParseError,
    },

    /// No CIDR file exists for the requested country
    #[error("no {family} block list for country '{country}' ({} not found)", path.display())]
    FileNotFound {
        country: String,
        family: AddressFamily,
        path: PathBuf,
    },

    /// Reading an input file failed for a reason other than absence
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A block would expand past the configured limit
    #[error("{cidr} spans {host_bits} host bits, above the limit of {limit}")]
    ExpansionTooLarge { cidr: String, host_bits: u8, limit: u8 },

    /// The cache artifact could not be written
    #[error("failed to write cache artifact {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A cache artifact exists but is not valid JSON of the expected shape
    #[error("cache artifact {} is corrupt: {source}", path.display())]
    CorruptArtifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A country code that cannot name a file in the data source
    #[error("invalid country code '{0}'")]
    InvalidCountry(String),
}
