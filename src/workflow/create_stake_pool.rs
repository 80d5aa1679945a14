//! Register a new stake pool owned by the leader (or faucet) key.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::jcli::{CommandRunner, KeyType, PoolId, PoolRegistration, SecretKey};
use crate::staging::write_private;
use crate::workflow::send_certificate::{send_certificate, SubmittedFragment};
use crate::workflow::Context;

/// File name of the registration certificate.
pub const CERTIFICATE_FILE: &str = "stake_pool.cert";
/// File name of the node secret for the new pool.
pub const SECRET_FILE: &str = "stake_pool.yaml";

/// A registered pool and where its files were written.
#[derive(Debug, Clone)]
pub struct StakePool {
    pub pool_id: PoolId,
    pub fragment: SubmittedFragment,
    pub certificate_path: PathBuf,
    pub secret_path: PathBuf,
}

/// Node secret file contents. JSON is a subset of YAML, so the node reads
/// it as its usual secret file.
#[derive(Serialize)]
struct NodeSecret<'a> {
    genesis: GenesisSecret<'a>,
}

#[derive(Serialize)]
struct GenesisSecret<'a> {
    sig_key: &'a str,
    vrf_key: &'a str,
    node_id: &'a str,
}

/// Generate pool keys, register the pool through a faucet-funded
/// certificate transaction and write its node secret into `out_dir`.
pub async fn create_stake_pool<R: CommandRunner>(
    ctx: &Context<R>,
    leader: Option<&SecretKey>,
    out_dir: &Path,
) -> Result<StakePool> {
    let jcli = ctx.jcli();

    // the faucet owns the pool unless a leader key is given
    let owner_key = match leader {
        Some(key) => key.clone(),
        None => ctx.faucet_key(),
    };
    let owner_public = jcli.key_to_public(&owner_key).await?;

    let vrf_secret = jcli.key_generate(KeyType::Curve25519_2HashDH).await?;
    let kes_secret = jcli.key_generate(KeyType::SumEd25519_12).await?;
    let vrf_public = jcli.key_to_public(&vrf_secret).await?;
    let kes_public = jcli.key_to_public(&kes_secret).await?;

    let certificate = jcli
        .certificate_new_stake_pool_registration(&PoolRegistration {
            kes_key: kes_public,
            vrf_key: vrf_public,
            owners: vec![owner_public.clone()],
            management_threshold: 1,
            start_validity: 0,
        })
        .await?;

    fs::create_dir_all(out_dir).map_err(|source| Error::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let certificate_path = out_dir.join(CERTIFICATE_FILE);
    fs::write(&certificate_path, format!("{}\n", certificate)).map_err(|source| Error::Io {
        path: certificate_path.clone(),
        source,
    })?;

    tracing::info!(
        owner = %owner_public,
        certificate = %certificate_path.display(),
        "Stake pool registration certificate created"
    );

    let fragment = send_certificate(ctx, &certificate_path, Some(&owner_key)).await?;

    let pool_id = jcli.certificate_get_stake_pool_id(&certificate_path).await?;

    let secret = NodeSecret {
        genesis: GenesisSecret {
            sig_key: kes_secret.expose(),
            vrf_key: vrf_secret.expose(),
            node_id: pool_id.as_str(),
        },
    };
    let contents = Zeroizing::new(serde_json::to_string_pretty(&secret)?);
    let secret_path = out_dir.join(SECRET_FILE);
    write_private(&secret_path, contents.as_bytes())?;

    tracing::info!(
        pool_id = %pool_id,
        secret = %secret_path.display(),
        "Stake pool registered"
    );

    Ok(StakePool {
        pool_id,
        fragment,
        certificate_path,
        secret_path,
    })
}
