//! Values exchanged with the external client, and its error type.

use std::fmt;

use bech32::FromBase32;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

/// Errors that can occur invoking the external client.
#[derive(Debug, Error)]
pub enum JcliError {
    /// The process could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Reading or writing the child's pipes failed.
    #[error("I/O error talking to `{command}`: {source}")]
    Io {
        command: String,
        source: std::io::Error,
    },

    /// The process exited with a non-zero status.
    #[error("`{command}` exited with status {code}: {}", stderr.trim())]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },

    // note: on unix an exit with no code means the process was
    // terminated by a signal.
    #[error("`{command}` terminated without exit code")]
    Killed { command: String },

    /// The process succeeded but printed nothing where a value was expected.
    #[error("`{command}` produced no output")]
    EmptyOutput { command: String },

    /// The process output could not be interpreted.
    #[error("unexpected output from `{command}`: {reason}")]
    Output { command: String, reason: String },
}

/// Result type for external client invocations.
pub type JcliResult<T> = Result<T, JcliError>;

/// Bech32 secret key, wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Zeroizing<String>);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        let mut raw = key.into();
        let key = Zeroizing::new(raw.trim().to_string());
        raw.zeroize();
        Self(key)
    }

    /// The bech32 text of the key. Only for handing to the client.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

macro_rules! text_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into().trim().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_newtype!(
    /// Bech32 public key.
    PublicKey
);
text_newtype!(
    /// Bech32 account address.
    Address
);
text_newtype!(
    /// Hex identifier of the data signed by witnesses.
    TransactionId
);
text_newtype!(
    /// Hex identifier of a message accepted by the node.
    FragmentId
);
text_newtype!(
    /// Hex identifier of a registered stake pool.
    PoolId
);

impl PublicKey {
    /// Hex encoding of the raw key bytes, which is how the node's REST
    /// API identifies accounts.
    pub fn account_id_hex(&self) -> Result<String, bech32::Error> {
        let (_hrp, data, _variant) = bech32::decode(&self.0)?;
        let bytes = Vec::<u8>::from_base32(&data)?;
        Ok(hex::encode(bytes))
    }
}

/// Per-account nonce preventing transaction replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SpendingCounter(pub u32);

impl fmt::Display for SpendingCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key algorithms the bootstrap needs from `jcli key generate`.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// Pool VRF key.
    Curve25519_2HashDH,
    /// Pool KES key.
    SumEd25519_12,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Curve25519_2HashDH => "Curve25519_2HashDH",
            KeyType::SumEd25519_12 => "SumEd25519_12",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address discrimination of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Discrimination {
    #[default]
    Test,
    Production,
}

impl Discrimination {
    /// Flag passed to `jcli address`, if any.
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Discrimination::Test => Some("--testing"),
            Discrimination::Production => None,
        }
    }
}
