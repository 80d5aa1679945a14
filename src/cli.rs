//! Command-line surface.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};

use crate::error::{Error, Result};
use crate::jcli::SecretKey;

#[derive(Debug, Parser)]
#[command(name = "pool-bootstrap", version)]
#[command(about = "Register stake pools and broadcast certificates funded by a faucet account", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored log output.
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Broadcast a signed certificate, paying fees from the faucet
    SendCertificate {
        /// File holding the certificate.
        certificate: PathBuf,

        /// Secret key (or file holding it) authenticating the certificate;
        /// defaults to the faucet key.
        signer_sk: Option<String>,
    },

    /// Generate pool keys and register a new stake pool
    CreateStakePool {
        /// Secret key (or file holding it) owning the pool; defaults to
        /// the faucet key.
        leader_sk: Option<String>,

        /// Directory receiving the certificate and node secret.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the amount a certificate transaction costs
    Fee,
}

/// Outcome of argument parsing.
#[derive(Debug)]
pub enum Parsed {
    Run(Cli),
    /// `--help` or `--version`; print and exit successfully.
    Info(String),
}

impl Cli {
    /// Parse arguments. Anything but help or version output is a usage
    /// error.
    pub fn parse_from_args<I, T>(args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(Parsed::Run(cli)),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Ok(Parsed::Info(e.to_string()))
            }
            Err(e) => Err(Error::Usage(e.to_string())),
        }
    }

    /// Log level implied by `-v` flags, if any.
    pub fn verbosity_level(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

/// Interpret a key argument: an existing file is read, anything else is
/// taken as the bech32 key itself.
pub fn resolve_secret_key(arg: &str) -> Result<SecretKey> {
    let path = Path::new(arg);
    if path.is_file() {
        let key = fs::read_to_string(path).map_err(|e| {
            Error::Usage(format!("cannot read secret key {}: {}", path.display(), e))
        })?;
        return non_empty(SecretKey::new(key));
    }
    non_empty(SecretKey::new(arg))
}

fn non_empty(key: SecretKey) -> Result<SecretKey> {
    if key.expose().is_empty() {
        return Err(Error::Usage("empty secret key".to_string()));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Cli {
        match Cli::parse_from_args(args).unwrap() {
            Parsed::Run(cli) => cli,
            Parsed::Info(text) => panic!("unexpected info output: {text}"),
        }
    }

    #[test]
    fn test_send_certificate_args() {
        let cli = run(&["pool-bootstrap", "send-certificate", "pool.cert"]);
        match cli.command {
            Command::SendCertificate {
                certificate,
                signer_sk,
            } => {
                assert_eq!(certificate, PathBuf::from("pool.cert"));
                assert!(signer_sk.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_certificate_is_usage_error() {
        let err = Cli::parse_from_args(["pool-bootstrap", "send-certificate"]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_extra_arguments_are_usage_error() {
        let err = Cli::parse_from_args([
            "pool-bootstrap",
            "send-certificate",
            "a.cert",
            "ed25519e_sk1x",
            "surplus",
        ])
        .unwrap_err();
        assert_eq!(err.exit_code(), 1);

        let err = Cli::parse_from_args(["pool-bootstrap"]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_help_is_not_an_error() {
        let parsed = Cli::parse_from_args(["pool-bootstrap", "--help"]).unwrap();
        assert!(matches!(parsed, Parsed::Info(text) if text.contains("create-stake-pool")));
    }

    #[test]
    fn test_verbosity() {
        let cli = run(&["pool-bootstrap", "-vv", "fee"]);
        assert_eq!(cli.verbosity_level(), Some("trace"));
        let cli = run(&["pool-bootstrap", "create-stake-pool", "--out-dir", "/tmp/pool"]);
        assert_eq!(cli.verbosity_level(), None);
    }

    #[test]
    fn test_resolve_secret_key() {
        let key = resolve_secret_key("ed25519e_sk1inline").unwrap();
        assert_eq!(key.expose(), "ed25519e_sk1inline");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leader.sk");
        fs::write(&path, "ed25519e_sk1fromfile\n").unwrap();
        let key = resolve_secret_key(path.to_str().unwrap()).unwrap();
        assert_eq!(key.expose(), "ed25519e_sk1fromfile");

        assert!(resolve_secret_key("  ").is_err());
    }
}
