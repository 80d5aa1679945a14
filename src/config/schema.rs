//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tool.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fees::LinearFee;
use crate::jcli::Discrimination;

/// Root configuration for the bootstrap tool.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// External command-line client.
    pub jcli: JcliConfig,

    /// Node REST endpoint.
    pub node: NodeConfig,

    /// Genesis block parameters.
    pub genesis: GenesisConfig,

    /// Fee schedule of the chain.
    pub fees: LinearFee,

    /// Faucet account paying for transactions.
    pub faucet: FaucetConfig,

    /// Logging and working directory.
    pub output: OutputConfig,

    /// Waiting for the posted fragment to land in a block.
    pub confirmation: ConfirmationConfig,
}

/// External command-line client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JcliConfig {
    /// Path to the `jcli` binary (looked up in `PATH` if bare).
    pub path: PathBuf,
}

impl Default for JcliConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("jcli"),
        }
    }
}

/// How REST calls reach the node.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RestBackend {
    /// Through the client's `rest v0` subcommands.
    #[default]
    Cli,
    /// Directly over HTTP.
    Http,
}

/// Node REST configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// REST base URL, including the `/api` prefix.
    pub rest_url: String,

    pub backend: RestBackend,

    /// HTTP request timeout in seconds (http backend only).
    pub request_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rest_url: "http://127.0.0.1:8443/api".to_string(),
            backend: RestBackend::Cli,
            request_timeout_secs: 10,
        }
    }
}

/// Genesis block parameters.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GenesisConfig {
    /// Hex hash of block 0, used when making witnesses.
    pub block0_hash: String,

    /// Address discrimination of the chain.
    pub discrimination: Discrimination,
}

/// Faucet account configuration.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FaucetConfig {
    /// Bech32 secret key. Prefer `POOL_BOOTSTRAP_FAUCET_SK` over the file.
    pub secret_key: String,
}

impl std::fmt::Debug for FaucetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaucetConfig")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Colored log output.
    pub colors: bool,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Directory for staging and witness files.
    pub workdir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            colors: true,
            log_level: "info".to_string(),
            workdir: PathBuf::from("."),
        }
    }
}

/// Fragment confirmation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    pub enabled: bool,

    /// Give up waiting after this many seconds.
    pub timeout_secs: u64,

    /// Fragment log polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: 60,
            poll_interval_ms: 1000,
        }
    }
}
