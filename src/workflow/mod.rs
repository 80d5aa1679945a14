//! Bootstrap workflows.
//!
//! # Data Flow
//! ```text
//! create_stake_pool.rs
//!     keys → registration certificate
//!     → send_certificate.rs
//!         faucet account → counter → staging → witness → seal → auth → post
//!         → confirm.rs (optional wait for the fragment)
//!     → pool id → node secret file
//! ```
//!
//! # Design Decisions
//! - Strictly sequential; the first failing step aborts the run
//! - Every step consumes the output captured from the previous one

pub mod confirm;
pub mod create_stake_pool;
pub mod send_certificate;

use std::time::Duration;

use crate::config::{RestBackend, Settings};
use crate::error::Result;
use crate::jcli::{Address, CommandRunner, Jcli, ProcessRunner, PublicKey, SecretKey};
use crate::rest::{HttpRest, JcliRest, NodeRest};

pub use confirm::wait_for_fragment;
pub use create_stake_pool::{create_stake_pool, StakePool};
pub use send_certificate::{send_certificate, SubmittedFragment};

/// Everything a workflow needs: settings, the client, and REST access.
pub struct Context<R = ProcessRunner> {
    settings: Settings,
    jcli: Jcli<R>,
    http: Option<HttpRest>,
}

impl Context<ProcessRunner> {
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_runner(settings, ProcessRunner)
    }
}

impl<R: CommandRunner> Context<R> {
    pub fn with_runner(settings: Settings, runner: R) -> Result<Self> {
        let http = match settings.node.backend {
            RestBackend::Http => Some(HttpRest::new(
                &settings.node.rest_url,
                Duration::from_secs(settings.node.request_timeout_secs),
            )?),
            RestBackend::Cli => None,
        };
        let jcli = Jcli::with_runner(settings.jcli.path.clone(), runner);
        Ok(Self {
            settings,
            jcli,
            http,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn jcli(&self) -> &Jcli<R> {
        &self.jcli
    }

    /// REST access according to the configured backend.
    pub fn rest(&self) -> Box<dyn NodeRest + '_> {
        match &self.http {
            Some(http) => Box::new(http.clone()),
            None => Box::new(JcliRest::new(&self.jcli, self.settings.node.rest_url.clone())),
        }
    }

    pub fn faucet_key(&self) -> SecretKey {
        SecretKey::new(self.settings.faucet.secret_key.as_str())
    }

    /// Derive the public key and account address of `secret`.
    pub async fn account_of(&self, secret: &SecretKey) -> Result<(PublicKey, Address)> {
        let public = self.jcli.key_to_public(secret).await?;
        let address = self
            .jcli
            .address_account(&public, self.settings.genesis.discrimination)
            .await?;
        Ok((public, address))
    }
}
