//! Broadcast a signed certificate in a faucet-funded transaction.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::jcli::{
    AccountWitness, Address, CommandRunner, FragmentId, SecretKey, SpendingCounter, TransactionId,
};
use crate::rest::FragmentStatus;
use crate::staging::StagingArea;
use crate::workflow::{confirm, Context};

/// Outcome of a successful broadcast.
#[derive(Debug, Clone)]
pub struct SubmittedFragment {
    pub fragment_id: FragmentId,
    pub transaction_id: TransactionId,
    pub faucet_address: Address,
    pub spending_counter: SpendingCounter,
    /// Amount taken from the faucet, all of it fees.
    pub amount: u64,
    /// Final status, when confirmation waiting is enabled.
    pub status: Option<FragmentStatus>,
}

/// Read a certificate file, treating any problem as a usage error.
pub fn read_certificate(path: &Path) -> Result<String> {
    let certificate = fs::read_to_string(path).map_err(|e| {
        Error::Usage(format!(
            "cannot read certificate {}: {}",
            path.display(),
            e
        ))
    })?;
    let certificate = certificate.trim();
    if certificate.is_empty() {
        return Err(Error::Usage(format!(
            "certificate {} is empty",
            path.display()
        )));
    }
    Ok(certificate.to_string())
}

/// Send the certificate at `certificate_path`, paying fees from the faucet.
///
/// `signer` authenticates the certificate payload (`transaction auth`);
/// the faucet key is used when none is given.
pub async fn send_certificate<R: CommandRunner>(
    ctx: &Context<R>,
    certificate_path: &Path,
    signer: Option<&SecretKey>,
) -> Result<SubmittedFragment> {
    let certificate = read_certificate(certificate_path)?;
    let settings = ctx.settings();
    let jcli = ctx.jcli();
    let rest = ctx.rest();

    let faucet_key = ctx.faucet_key();
    let (faucet_public, faucet_address) = ctx.account_of(&faucet_key).await?;
    let spending_counter = rest
        .account_counter(&faucet_address, &faucet_public)
        .await?;
    let amount = settings.fees.certificate_transaction_amount()?;

    tracing::info!(
        faucet = %faucet_address,
        counter = %spending_counter,
        amount = amount,
        certificate = %certificate_path.display(),
        "Sending certificate"
    );

    let mut area = StagingArea::for_current_process(&settings.output.workdir)?;
    let staging = area.staging_path().to_path_buf();

    jcli.transaction_new(&staging).await?;
    jcli.transaction_add_account(&staging, &faucet_address, amount)
        .await?;
    jcli.transaction_add_certificate(&staging, &certificate)
        .await?;
    jcli.transaction_finalize(&staging).await?;

    let transaction_id = jcli.transaction_data_for_witness(&staging).await?;
    tracing::debug!(transaction_id = %transaction_id, "Transaction finalized");

    let witness_secret = area.write_witness_secret(&faucet_key)?.to_path_buf();
    jcli.transaction_make_witness(&AccountWitness {
        transaction_id: &transaction_id,
        block0_hash: settings.genesis.block0_hash.trim(),
        spending_counter,
        output: area.witness_output_path(),
        secret: &witness_secret,
    })
    .await?;
    jcli.transaction_add_witness(&staging, area.witness_output_path())
        .await?;
    jcli.transaction_seal(&staging).await?;

    let auth_key = area.write_secret("auth.secret", signer.unwrap_or(&faucet_key))?;
    jcli.transaction_auth(&staging, &auth_key).await?;

    let message = jcli.transaction_to_message(&staging).await?;
    let fragment_id = rest.post_message(&message).await?;
    tracing::info!(fragment_id = %fragment_id, "Certificate transaction posted");

    area.finish()?;

    let status = if settings.confirmation.enabled {
        let status =
            confirm::wait_for_fragment(rest.as_ref(), &fragment_id, &settings.confirmation).await?;
        Some(status)
    } else {
        None
    };

    Ok(SubmittedFragment {
        fragment_id,
        transaction_id,
        faucet_address,
        spending_counter,
        amount,
        status,
    })
}
