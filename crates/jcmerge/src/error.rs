//! Error taxonomy for a merge run
//!
//! A merge either fully succeeds or fully fails. The only distinction the
//! command line cares about is whether the failure came from bad
//! configuration (rejected before touching the filesystem) or from I/O.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    /// A curve identifier outside the supported set was requested
    #[error("unknown curve `{name}` (expected one of: {expected})")]
    UnknownCurve { name: String, expected: String },

    /// The configuration is inconsistent or could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A source file could not be read or the output could not be written
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error was raised while validating configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownCurve { .. } | Self::InvalidConfig(_))
    }
}

/// Whether any error in the chain is a configuration error
pub fn is_configuration_error(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<MergeError>())
        .any(MergeError::is_configuration)
}
