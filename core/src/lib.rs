//! # cidr2ip core
//!
//! Turns the per-country CIDR lists of a git-hosted data source into cached
//! lists of individual addresses.
//!
//! * **[`repository`]**: keeps the local working copy in sync with the remote.
//! * **[`expander`]**: reads and validates a country's `.cidr` file.
//! * **[`cache`]**: streams the expanded addresses into a JSON artifact.
//! * **[`pipeline`]**: sequences the three steps for one invocation.
//! * **[`progress`]**: the hook the CLI uses to render per-record progress.

pub mod cache;
pub mod error;
pub mod expander;
pub mod pipeline;
pub mod progress;
pub mod repository;

pub use error::{Cidr2IpError, Result};
