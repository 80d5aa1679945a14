//! Top-level error type and exit status mapping.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::fees::FeeError;
use crate::jcli::{FragmentId, JcliError};
use crate::rest::RestError;
use crate::staging::StagingError;

/// Errors that abort a bootstrap run.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong arguments or unreadable input file.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error(transparent)]
    Jcli(#[from] JcliError),

    #[error(transparent)]
    Rest(#[from] RestError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("fragment {fragment_id} rejected: {reason}")]
    Rejected {
        fragment_id: FragmentId,
        reason: String,
    },

    #[error("fragment {fragment_id} not in a block after {waited_secs} seconds")]
    ConfirmationTimeout {
        fragment_id: FragmentId,
        waited_secs: u64,
    },

    #[error("interrupted")]
    Interrupted,
}

/// Result type for bootstrap operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Process exit status for this error.
    ///
    /// 1 for usage and generic failures, 2 when the staging file already
    /// exists, 130 on Ctrl-C, and the client's own status when it failed.
    pub fn exit_code(&self) -> u8 {
        let external = match self {
            Error::Usage(_) => return 1,
            Error::Staging(StagingError::AlreadyExists(_)) => return 2,
            Error::Interrupted => return 130,
            Error::Jcli(JcliError::Failed { code, .. }) => *code,
            Error::Rest(RestError::Jcli(JcliError::Failed { code, .. })) => *code,
            _ => return 1,
        };
        u8::try_from(external)
            .ok()
            .filter(|code| *code != 0)
            .unwrap_or(1)
    }
}
