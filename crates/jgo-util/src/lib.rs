//! Shared utilities for jgo.
//!
//! Cross-cutting concerns used by every other jgo crate: error types,
//! filesystem helpers, advisory file locking, cryptographic hashing,
//! process spawning, terminal progress indicators, and the small set of
//! `JGO_*` environment variables the core recognizes.

pub mod dirs;
pub mod env;
pub mod errors;
pub mod fs;
pub mod hash;
pub mod lock;
pub mod process;
pub mod progress;

/// Install a `tracing-subscriber` formatter honoring `RUST_LOG`/`JGO_LOG`.
///
/// Call once from the binary entry point. Safe to call more than once;
/// subsequent calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("JGO_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
