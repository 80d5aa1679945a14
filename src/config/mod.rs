//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (POOL_BOOTSTRAP_*, NO_COLOR)
//!     → validation.rs (semantic checks)
//!     → output flags from the command line (main.rs)
//!     → Settings (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - Typed settings replace placeholder substitution into script bodies
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, read_settings, ConfigError, FAUCET_SK_ENV_VAR};
pub use schema::{
    ConfirmationConfig, FaucetConfig, GenesisConfig, JcliConfig, NodeConfig, OutputConfig,
    RestBackend, Settings,
};
pub use validation::{validate_settings, ValidationError};
