//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! workflows, jcli runner, staging cleanup
//!     → tracing events (structured fields, never secret keys)
//!     → logging.rs subscriber → stderr
//! ```

pub mod logging;

pub use logging::init_logging;
