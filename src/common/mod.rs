//! Shared utilities: configuration, errors, diagnostics.
pub mod config;
pub mod cstr;
pub mod error;
pub mod log;

pub use config::BridgeCfg;
pub use error::{BridgeError, BridgeResult};
