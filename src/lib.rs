//! Stake pool bootstrap library.
//!
//! Drives an external blockchain client and a node REST endpoint to
//! register stake pools and broadcast certificates paid for by a faucet
//! account.

pub mod cli;
pub mod config;
pub mod error;
pub mod fees;
pub mod jcli;
pub mod lifecycle;
pub mod observability;
pub mod rest;
pub mod staging;
pub mod workflow;

pub use config::Settings;
pub use error::{Error, Result};
pub use workflow::Context;
