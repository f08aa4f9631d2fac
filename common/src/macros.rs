//! Status logging macros.
//!
//! These are thin wrappers over `tracing` that tag an event so the CLI
//! formatter can pick the right status symbol.

/// Logs a completed step. Rendered with the success marker by the CLI.
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        $crate::__tracing::info!(success = true, $($arg)+)
    };
}
