//! Linear fee schedule.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fee schedule of the chain, as set in the genesis block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinearFee {
    /// Flat fee paid by every transaction.
    pub constant: u64,

    /// Fee per input and output.
    pub coefficient: u64,

    /// Extra fee for a transaction carrying a certificate.
    pub certificate: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    #[error("fee sum overflows: constant {constant} + certificate {certificate} + coefficient {coefficient}")]
    Overflow {
        constant: u64,
        certificate: u64,
        coefficient: u64,
    },
}

impl LinearFee {
    pub fn new(constant: u64, coefficient: u64, certificate: u64) -> Self {
        Self {
            constant,
            coefficient,
            certificate,
        }
    }

    /// Amount the faucet input must carry for a certificate transaction
    /// with one input and no outputs.
    pub fn certificate_transaction_amount(&self) -> Result<u64, FeeError> {
        self.constant
            .checked_add(self.certificate)
            .and_then(|sum| sum.checked_add(self.coefficient))
            .ok_or(FeeError::Overflow {
                constant: self.constant,
                certificate: self.certificate,
                coefficient: self.coefficient,
            })
    }
}
