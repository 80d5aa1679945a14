//! Interrupt handling.
//!
//! A run is a single future; on SIGINT it is dropped, which removes staging
//! and secret files and kills any running client process.

use std::future::Future;

use crate::error::{Error, Result};

/// Drive `run` to completion unless the process receives Ctrl-C first.
pub async fn run_until_interrupted<F, T>(run: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    run_until(run, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Drive `run` to completion unless `interrupt` resolves first.
pub async fn run_until<F, I, T>(run: F, interrupt: I) -> Result<T>
where
    F: Future<Output = Result<T>>,
    I: Future<Output = ()>,
{
    tokio::select! {
        result = run => result,
        _ = interrupt => {
            tracing::warn!("Interrupted, cleaning up");
            Err(Error::Interrupted)
        }
    }
}
