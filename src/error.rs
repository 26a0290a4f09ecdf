use crate::validation::disposable::DisposableSourceError;
use thiserror::Error;

/// Failure of a validation call that cannot be expressed in a report.
///
/// Bad syntax and DNS failures are not errors; they end up in the report.
/// Anything here is answered with a 500 by the HTTP layer.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("disposable domain lookup failed: {0}")]
    Disposable(#[from] DisposableSourceError),
}

/// Startup configuration problems; the service refuses to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0} must be set when MONGODB_URI is set")]
    MissingVariable(&'static str),
    #[error("DISPOSABLE_DOMAINS_FILE and MONGODB_URI cannot both be set")]
    ConflictingDisposableSources,
    #[error("failed to configure DNS resolver: {0}")]
    Resolver(String),
    #[error(transparent)]
    Disposable(#[from] DisposableSourceError),
}
