//! # cidr2ip common
//!
//! Building blocks shared by the core library and the CLI:
//!
//! * **[`config`]**: the run configuration, built once and passed around by reference.
//! * **[`network`]**: address families, CIDR parsing and lazy address ranges.
//! * **[`macros`]**: status logging helpers such as [`success!`].

pub mod config;
pub mod macros;
pub mod network;

#[doc(hidden)]
pub use tracing as __tracing;
