//! Stake pool bootstrap tool.
//!
//! # Architecture Overview
//!
//! ```text
//!   pool-bootstrap <command>
//!        │
//!        ▼
//!   ┌─────────┐    ┌──────────────────────────────────────────────┐
//!   │ config  │───▶│                 workflow                      │
//!   └─────────┘    │  create_stake_pool ─▶ send_certificate        │
//!                  │                        │        │      │      │
//!                  └────────────────────────┼────────┼──────┼──────┘
//!                                           ▼        ▼      ▼
//!                                       ┌──────┐ ┌──────┐ ┌─────────┐
//!                                       │ jcli │ │ rest │ │ staging │
//!                                       └──┬───┘ └──┬───┘ └─────────┘
//!                                          ▼        ▼
//!                                   external client  node REST
//! ```

use std::process::ExitCode;

use pool_bootstrap::cli::{resolve_secret_key, Cli, Command, Parsed};
use pool_bootstrap::config::{load_settings, read_settings, FAUCET_SK_ENV_VAR};
use pool_bootstrap::error::Result;
use pool_bootstrap::lifecycle::run_until_interrupted;
use pool_bootstrap::observability::init_logging;
use pool_bootstrap::workflow::{create_stake_pool, send_certificate, Context};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::parse_from_args(std::env::args_os()) {
        Ok(Parsed::Run(cli)) => cli,
        Ok(Parsed::Info(text)) => {
            print!("{}", text);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprint!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    match run_until_interrupted(run(cli)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = match cli.command {
        Command::Fee => read_settings(cli.config.as_deref())?,
        _ => load_settings(cli.config.as_deref())?,
    };
    if cli.no_color {
        settings.output.colors = false;
    }
    let level = cli
        .verbosity_level()
        .unwrap_or(settings.output.log_level.as_str())
        .to_string();
    init_logging(&level, settings.output.colors);

    tracing::info!(
        jcli = %settings.jcli.path.display(),
        rest_url = %settings.node.rest_url,
        backend = ?settings.node.backend,
        "pool-bootstrap v{} starting",
        env!("CARGO_PKG_VERSION")
    );
    if !settings.faucet.secret_key.is_empty() && std::env::var_os(FAUCET_SK_ENV_VAR).is_none() {
        tracing::warn!(
            env_var = FAUCET_SK_ENV_VAR,
            "Faucet secret key read from the configuration file"
        );
    }

    match cli.command {
        Command::Fee => {
            println!("{}", settings.fees.certificate_transaction_amount()?);
        }
        Command::SendCertificate {
            certificate,
            signer_sk,
        } => {
            let signer = signer_sk.as_deref().map(resolve_secret_key).transpose()?;
            let ctx = Context::new(settings)?;
            let fragment = send_certificate(&ctx, &certificate, signer.as_ref()).await?;
            println!("{}", fragment.fragment_id);
        }
        Command::CreateStakePool { leader_sk, out_dir } => {
            let leader = leader_sk.as_deref().map(resolve_secret_key).transpose()?;
            let ctx = Context::new(settings)?;
            let pool = create_stake_pool(&ctx, leader.as_ref(), &out_dir).await?;
            println!("{}", pool.pool_id);
        }
    }

    Ok(())
}
