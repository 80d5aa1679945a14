//! Node REST access.
//!
//! # Data Flow
//! ```text
//! workflow
//!     → NodeRest (client.rs)
//!         → JcliRest: `jcli rest v0 ...` (default)
//!         → HttpRest: reqwest against {rest_url}/v0/...
//!     → types.rs (AccountState, FragmentLog)
//! ```

pub mod client;
pub mod types;

pub use client::{HttpRest, JcliRest, NodeRest};
pub use types::{AccountState, FragmentLog, FragmentStatus, RestError, RestResult};
