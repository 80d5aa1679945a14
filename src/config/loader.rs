//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::Settings;
use crate::config::validation::{validate_settings, ValidationError};

/// Environment variable overriding `jcli.path`.
pub const JCLI_ENV_VAR: &str = "POOL_BOOTSTRAP_JCLI";
/// Environment variable overriding `node.rest_url`.
pub const REST_URL_ENV_VAR: &str = "POOL_BOOTSTRAP_REST_URL";
/// Environment variable overriding `genesis.block0_hash`.
pub const BLOCK0_HASH_ENV_VAR: &str = "POOL_BOOTSTRAP_BLOCK0_HASH";
/// Environment variable holding the faucet secret key.
pub const FAUCET_SK_ENV_VAR: &str = "POOL_BOOTSTRAP_FAUCET_SK";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load settings from an optional TOML file, apply environment overrides
/// and validate the result.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let settings = read_settings(path)?;
    validate_settings(&settings).map_err(ConfigError::Validation)?;
    Ok(settings)
}

/// Like [`load_settings`] without semantic validation.
pub fn read_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => Settings::default(),
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// Overlay environment values onto `settings`.
///
/// `lookup` abstracts `std::env::var` so tests don't touch process state.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(JCLI_ENV_VAR) {
        settings.jcli.path = PathBuf::from(path);
    }
    if let Some(url) = lookup(REST_URL_ENV_VAR) {
        settings.node.rest_url = url;
    }
    if let Some(hash) = lookup(BLOCK0_HASH_ENV_VAR) {
        settings.genesis.block0_hash = hash;
    }
    if let Some(key) = lookup(FAUCET_SK_ENV_VAR) {
        settings.faucet.secret_key = key;
    }
    // https://no-color.org
    if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        settings.output.colors = false;
    }
}
