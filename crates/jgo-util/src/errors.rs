use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all jgo operations.
///
/// Each variant corresponds to one of the discriminated error kinds the
/// core is required to surface: parse failures, missing artifacts, offline
/// cache misses, mediation conflicts (strict mode only), checksum
/// mismatches, resolution failures, I/O, and launch-planning failures.
#[derive(Debug, Error, Diagnostic)]
pub enum JgoError {
    /// Malformed coordinate, endpoint, POM, or project-file input.
    #[error("parse error: {message}")]
    #[diagnostic(help("check the coordinate/endpoint/project-file syntax"))]
    ParseError { message: String },

    /// POM or artifact missing in every configured repository.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Offline mode was requested and the local cache had no matching entry.
    #[error("not available offline: {message}")]
    NotAvailableOffline { message: String },

    /// Irreconcilable version constraint (only raised when strict mode is on).
    #[error("version conflict: {message}")]
    Conflict { message: String },

    /// SHA-256 mismatch against a lock file entry or repository sidecar.
    #[error("integrity error: {message}")]
    IntegrityError { message: String },

    /// Parent cycle, interpolation cycle, or excessive recursion depth.
    #[error("resolution error: {message}")]
    ResolutionError { message: String },

    /// Filesystem failure with an underlying cause.
    #[error("I/O error: {0}")]
    IOErr(#[from] std::io::Error),

    /// No main class found, main class ambiguous, or JDK too old.
    #[error("launch error: {message}")]
    LaunchError { message: String },

    /// Transient or permanent network failure (kept distinct from `IOErr`
    /// so retry logic can match on it specifically).
    #[error("network error: {message}")]
    Network { message: String },

    /// Catch-all for miscellaneous errors that don't fit another kind.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type JgoResult<T> = miette::Result<T>;
