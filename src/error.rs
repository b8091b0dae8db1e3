//! Error types for identity resolution.

use std::fmt;
use std::path::PathBuf;

use crate::ports::store::PortError;

/// The storage step that failed during a get-or-create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Creating the `agents` or per-agent directory.
    ProvisionDirectory,
    /// Reading an existing identity record.
    ReadRecord,
    /// Creating a new identity record.
    WriteRecord,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ProvisionDirectory => "directory provisioning",
            Self::ReadRecord => "record read",
            Self::WriteRecord => "record write",
        })
    }
}

/// Errors returned by [`IdentityStore`](crate::identity::IdentityStore).
///
/// A call that returns an error never yields an instance ID.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// A caller-supplied argument is missing or malformed.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The backing store failed.
    #[error("{phase} failed for {}: {source}", path.display())]
    Storage {
        /// Step that failed.
        phase: Phase,
        /// Path being operated on.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: PortError,
    },

    /// Configuration could not be resolved or loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl IdentityError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { field, reason: reason.into() }
    }

    pub(crate) fn storage(phase: Phase, path: impl Into<PathBuf>, source: impl Into<PortError>) -> Self {
        Self::Storage { phase, path: path.into(), source: source.into() }
    }

    /// The failed phase, for storage errors.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Storage { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
