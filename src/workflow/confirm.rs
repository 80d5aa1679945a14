//! Waiting for a posted fragment to land in a block.

use std::time::Duration;

use tokio::time::{interval, timeout};

use crate::config::ConfirmationConfig;
use crate::error::{Error, Result};
use crate::jcli::FragmentId;
use crate::rest::{FragmentStatus, NodeRest};

/// Poll the node's fragment logs until `fragment_id` is in a block.
///
/// A rejection or the deadline in `config` ends the wait with an error.
/// A fragment missing from the logs counts as pending.
pub async fn wait_for_fragment(
    rest: &dyn NodeRest,
    fragment_id: &FragmentId,
    config: &ConfirmationConfig,
) -> Result<FragmentStatus> {
    let poll_interval = Duration::from_millis(config.poll_interval_ms);

    let result = timeout(Duration::from_secs(config.timeout_secs), async {
        let mut ticker = interval(poll_interval);

        loop {
            ticker.tick().await;

            let logs = rest.fragment_logs().await?;
            let status = logs
                .into_iter()
                .find(|log| &log.fragment_id == fragment_id)
                .map(|log| log.status);

            match status {
                Some(FragmentStatus::Rejected { reason }) => {
                    return Err(Error::Rejected {
                        fragment_id: fragment_id.clone(),
                        reason,
                    });
                }
                Some(status @ FragmentStatus::InABlock { .. }) => {
                    tracing::info!(fragment_id = %fragment_id, "Fragment is in a block");
                    return Ok(status);
                }
                Some(FragmentStatus::Pending) | None => {
                    tracing::debug!(fragment_id = %fragment_id, "Fragment pending");
                }
            }
        }
    })
    .await;

    match result {
        Ok(status) => status,
        Err(_) => Err(Error::ConfirmationTimeout {
            fragment_id: fragment_id.clone(),
            waited_secs: config.timeout_secs,
        }),
    }
}
