//! Node REST payloads and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::jcli::{FragmentId, JcliError};

/// Errors that can occur talking to the node.
#[derive(Debug, Error)]
pub enum RestError {
    #[error("invalid REST URL '{url}': {reason}")]
    Url { url: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("node returned {status}: {}", body.trim())]
    Status { status: u16, body: String },

    #[error("cannot derive account id from public key: {0}")]
    AccountId(#[from] bech32::Error),

    #[error("message is not valid hex: {0}")]
    Message(#[from] hex::FromHexError),

    #[error(transparent)]
    Jcli(#[from] JcliError),
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;

/// Account state as reported by `GET /v0/account/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountState {
    #[serde(default)]
    pub value: u64,
    pub counter: u32,
}

/// Processing status of a fragment in the node's logs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum FragmentStatus {
    Pending,
    Rejected {
        reason: String,
    },
    InABlock {
        #[serde(default)]
        date: serde_json::Value,
        block: String,
    },
}

/// One entry of `GET /v0/fragment/logs`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FragmentLog {
    pub fragment_id: FragmentId,
    pub status: FragmentStatus,
}
