//! Node REST clients.
//!
//! # Responsibilities
//! - Read the spending counter of an account
//! - Post a serialized transaction message
//! - Read fragment logs for confirmation polling
//!
//! # Design Decisions
//! - Default path goes through the client's `rest v0` subcommands
//! - The HTTP client has a per-request timeout; the CLI path has none
//! - Never retry: a post is not idempotent

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::jcli::{Address, CommandRunner, FragmentId, Jcli, PublicKey, SpendingCounter};
use crate::rest::types::{AccountState, FragmentLog, RestError, RestResult};

/// Operations the workflows need from the node.
#[async_trait]
pub trait NodeRest: Send + Sync {
    /// Current spending counter of the account owning `public`.
    async fn account_counter(
        &self,
        address: &Address,
        public: &PublicKey,
    ) -> RestResult<SpendingCounter>;

    /// Submit a hex-encoded message; returns the fragment id.
    async fn post_message(&self, message_hex: &str) -> RestResult<FragmentId>;

    async fn fragment_logs(&self) -> RestResult<Vec<FragmentLog>>;
}

/// REST access through `jcli rest v0`.
pub struct JcliRest<'a, R> {
    jcli: &'a Jcli<R>,
    rest_url: String,
}

impl<'a, R: CommandRunner> JcliRest<'a, R> {
    pub fn new(jcli: &'a Jcli<R>, rest_url: impl Into<String>) -> Self {
        Self {
            jcli,
            rest_url: rest_url.into(),
        }
    }
}

#[async_trait]
impl<'a, R: CommandRunner> NodeRest for JcliRest<'a, R> {
    async fn account_counter(
        &self,
        address: &Address,
        _public: &PublicKey,
    ) -> RestResult<SpendingCounter> {
        Ok(self.jcli.rest_account_counter(address, &self.rest_url).await?)
    }

    async fn post_message(&self, message_hex: &str) -> RestResult<FragmentId> {
        Ok(self.jcli.rest_message_post(message_hex, &self.rest_url).await?)
    }

    async fn fragment_logs(&self) -> RestResult<Vec<FragmentLog>> {
        Ok(self.jcli.rest_fragment_logs(&self.rest_url).await?)
    }
}

/// Direct HTTP access to the node's v0 REST API.
#[derive(Clone)]
pub struct HttpRest {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRest {
    /// Create a client for `rest_url` (e.g. `http://127.0.0.1:8443/api`).
    pub fn new(rest_url: &str, timeout: Duration) -> RestResult<Self> {
        let parsed = url::Url::parse(rest_url).map_err(|e| RestError::Url {
            url: rest_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(RestError::Url {
                url: rest_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: rest_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v0/{}", self.base_url, path)
    }

    async fn checked(response: reqwest::Response) -> RestResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RestError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl NodeRest for HttpRest {
    async fn account_counter(
        &self,
        _address: &Address,
        public: &PublicKey,
    ) -> RestResult<SpendingCounter> {
        let account_id = public.account_id_hex()?;
        let response = self
            .client
            .get(self.endpoint(&format!("account/{}", account_id)))
            .send()
            .await?;
        let state: AccountState = Self::checked(response).await?.json().await?;
        tracing::debug!(counter = state.counter, value = state.value, "Account state");
        Ok(SpendingCounter(state.counter))
    }

    async fn post_message(&self, message_hex: &str) -> RestResult<FragmentId> {
        let body = hex::decode(message_hex.trim())?;
        let response = self
            .client
            .post(self.endpoint("message"))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await?;
        let id = Self::checked(response).await?.text().await?;
        Ok(FragmentId::new(id))
    }

    async fn fragment_logs(&self) -> RestResult<Vec<FragmentLog>> {
        let response = self.client.get(self.endpoint("fragment/logs")).send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }
}

impl std::fmt::Debug for HttpRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRest")
            .field("base_url", &self.base_url)
            .finish()
    }
}
