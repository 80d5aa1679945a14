//! Typed wrapper over the client's subcommands.

use std::path::{Path, PathBuf};

use crate::jcli::runner::{describe, CommandRunner, ProcessRunner};
use crate::jcli::types::{
    Address, Discrimination, FragmentId, JcliError, JcliResult, KeyType, PoolId, PublicKey,
    SecretKey, SpendingCounter, TransactionId,
};
use crate::rest::types::FragmentLog;

/// Parameters of a stake pool registration certificate.
#[derive(Debug, Clone)]
pub struct PoolRegistration {
    pub kes_key: PublicKey,
    pub vrf_key: PublicKey,
    pub owners: Vec<PublicKey>,
    pub management_threshold: u8,
    pub start_validity: u64,
}

/// Parameters of `transaction make-witness` for an account input.
#[derive(Debug, Clone)]
pub struct AccountWitness<'a> {
    pub transaction_id: &'a TransactionId,
    pub block0_hash: &'a str,
    pub spending_counter: SpendingCounter,
    pub output: &'a Path,
    pub secret: &'a Path,
}

/// Handle on the external client.
#[derive(Debug, Clone)]
pub struct Jcli<R = ProcessRunner> {
    path: PathBuf,
    runner: R,
}

impl<R: CommandRunner> Jcli<R> {
    pub fn with_runner(path: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            path: path.into(),
            runner,
        }
    }

    async fn exec(&self, args: Vec<String>, stdin: Option<&str>) -> JcliResult<String> {
        let output = self.runner.run(&self.path, &args, stdin).await?;
        Ok(output.stdout)
    }

    /// Run and return trimmed stdout, which must not be empty.
    async fn capture(&self, args: Vec<String>, stdin: Option<&str>) -> JcliResult<String> {
        let command = describe(&self.path, &args);
        let stdout = self.exec(args, stdin).await?;
        let value = stdout.trim();
        if value.is_empty() {
            return Err(JcliError::EmptyOutput { command });
        }
        Ok(value.to_string())
    }

    // ---- keys ----------------------------------------------------------

    pub async fn key_generate(&self, key_type: KeyType) -> JcliResult<SecretKey> {
        let key = self
            .capture(args(["key", "generate", &format!("--type={}", key_type)]), None)
            .await?;
        Ok(SecretKey::new(key))
    }

    pub async fn key_to_public(&self, secret: &SecretKey) -> JcliResult<PublicKey> {
        let key = self
            .capture(args(["key", "to-public"]), Some(secret.expose()))
            .await?;
        Ok(PublicKey::new(key))
    }

    pub async fn address_account(
        &self,
        public: &PublicKey,
        discrimination: Discrimination,
    ) -> JcliResult<Address> {
        let mut argv = args(["address", "account"]);
        argv.extend(discrimination.flag().map(str::to_string));
        argv.push(public.to_string());
        Ok(Address::new(self.capture(argv, None).await?))
    }

    // ---- certificates --------------------------------------------------

    /// Build a registration certificate and return its text.
    pub async fn certificate_new_stake_pool_registration(
        &self,
        registration: &PoolRegistration,
    ) -> JcliResult<String> {
        let mut argv = args([
            "certificate",
            "new",
            "stake-pool-registration",
            "--kes-key",
            registration.kes_key.as_str(),
            "--vrf-key",
            registration.vrf_key.as_str(),
        ]);
        for owner in &registration.owners {
            argv.push("--owner".to_string());
            argv.push(owner.to_string());
        }
        argv.extend(args([
            "--management-threshold",
            &registration.management_threshold.to_string(),
            "--start-validity",
            &registration.start_validity.to_string(),
        ]));
        self.capture(argv, None).await
    }

    pub async fn certificate_get_stake_pool_id(&self, certificate: &Path) -> JcliResult<PoolId> {
        let argv = args([
            "certificate",
            "get-stake-pool-id",
            &certificate.display().to_string(),
        ]);
        Ok(PoolId::new(self.capture(argv, None).await?))
    }

    // ---- transaction staging -------------------------------------------

    pub async fn transaction_new(&self, staging: &Path) -> JcliResult<()> {
        self.exec(staged(["transaction", "new"], staging, []), None)
            .await
            .map(drop)
    }

    pub async fn transaction_add_account(
        &self,
        staging: &Path,
        address: &Address,
        amount: u64,
    ) -> JcliResult<()> {
        let argv = staged(
            ["transaction", "add-account"],
            staging,
            [address.to_string(), amount.to_string()],
        );
        self.exec(argv, None).await.map(drop)
    }

    pub async fn transaction_add_certificate(
        &self,
        staging: &Path,
        certificate: &str,
    ) -> JcliResult<()> {
        let argv = staged(
            ["transaction", "add-certificate"],
            staging,
            [certificate.trim().to_string()],
        );
        self.exec(argv, None).await.map(drop)
    }

    pub async fn transaction_finalize(&self, staging: &Path) -> JcliResult<()> {
        self.exec(staged(["transaction", "finalize"], staging, []), None)
            .await
            .map(drop)
    }

    pub async fn transaction_data_for_witness(&self, staging: &Path) -> JcliResult<TransactionId> {
        let argv = staged(["transaction", "data-for-witness"], staging, []);
        Ok(TransactionId::new(self.capture(argv, None).await?))
    }

    pub async fn transaction_make_witness(&self, witness: &AccountWitness<'_>) -> JcliResult<()> {
        let argv = args([
            "transaction",
            "make-witness",
            witness.transaction_id.as_str(),
            "--genesis-block-hash",
            witness.block0_hash,
            "--type",
            "account",
            "--account-spending-counter",
            &witness.spending_counter.to_string(),
            &witness.output.display().to_string(),
            &witness.secret.display().to_string(),
        ]);
        self.exec(argv, None).await.map(drop)
    }

    pub async fn transaction_add_witness(&self, staging: &Path, witness: &Path) -> JcliResult<()> {
        let argv = staged(
            ["transaction", "add-witness"],
            staging,
            [witness.display().to_string()],
        );
        self.exec(argv, None).await.map(drop)
    }

    pub async fn transaction_seal(&self, staging: &Path) -> JcliResult<()> {
        self.exec(staged(["transaction", "seal"], staging, []), None)
            .await
            .map(drop)
    }

    /// Add the payload authentication (certificate owner signature).
    pub async fn transaction_auth(&self, staging: &Path, key_file: &Path) -> JcliResult<()> {
        let mut argv = args(["transaction", "auth", "--key"]);
        argv.push(key_file.display().to_string());
        argv.push("--staging".to_string());
        argv.push(staging.display().to_string());
        self.exec(argv, None).await.map(drop)
    }

    /// Serialize the sealed transaction to a hex message.
    pub async fn transaction_to_message(&self, staging: &Path) -> JcliResult<String> {
        self.capture(staged(["transaction", "to-message"], staging, []), None)
            .await
    }

    // ---- rest ----------------------------------------------------------

    pub async fn rest_account_counter(
        &self,
        address: &Address,
        rest_url: &str,
    ) -> JcliResult<SpendingCounter> {
        let argv = args(["rest", "v0", "account", "get", address.as_str(), "-h", rest_url]);
        let command = describe(&self.path, &argv);
        let output = self.capture(argv, None).await?;
        parse_counter(&output).ok_or_else(|| JcliError::Output {
            command,
            reason: "no numeric `counter:` line".to_string(),
        })
    }

    pub async fn rest_message_post(&self, message: &str, rest_url: &str) -> JcliResult<FragmentId> {
        let argv = args(["rest", "v0", "message", "post", "-h", rest_url]);
        let id = self.capture(argv, Some(message)).await?;
        Ok(FragmentId::new(id))
    }

    pub async fn rest_fragment_logs(&self, rest_url: &str) -> JcliResult<Vec<FragmentLog>> {
        let argv = args([
            "rest",
            "v0",
            "message",
            "logs",
            "-h",
            rest_url,
            "--output-format",
            "json",
        ]);
        let command = describe(&self.path, &argv);
        let output = self.capture(argv, None).await?;
        serde_json::from_str(&output).map_err(|e| JcliError::Output {
            command,
            reason: e.to_string(),
        })
    }
}

fn args<const N: usize>(list: [&str; N]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// `<subcommand..> --staging <file> <positional..>`
fn staged<const N: usize, const M: usize>(
    subcommand: [&str; N],
    staging: &Path,
    positional: [String; M],
) -> Vec<String> {
    let mut argv = args(subcommand);
    argv.push("--staging".to_string());
    argv.push(staging.display().to_string());
    argv.extend(positional);
    argv
}

/// Extract the spending counter from `rest v0 account get` YAML output.
pub fn parse_counter(output: &str) -> Option<SpendingCounter> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("counter:"))
        .and_then(|value| value.trim().parse().ok())
        .map(SpendingCounter)
}
