//! External command-line client integration.
//!
//! # Data Flow
//! ```text
//! workflow step
//!     → commands.rs (typed subcommand, argv assembly)
//!     → runner.rs (spawn, stdin, capture, exit status)
//!     → types.rs (trimmed output parsed into newtypes)
//! ```
//!
//! # Security Constraints
//! - Secret keys reach the client through stdin or 0600 files only
//! - Never log secret keys

pub mod commands;
pub mod runner;
pub mod types;

pub use commands::{parse_counter, AccountWitness, Jcli, PoolRegistration};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use types::{
    Address, Discrimination, FragmentId, JcliError, JcliResult, KeyType, PoolId, PublicKey,
    SecretKey, SpendingCounter, TransactionId,
};
