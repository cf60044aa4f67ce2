//! Error handling primitives shared across the core.
//!
//! Nothing here crosses the C boundary: the api layer turns every error into
//! the sentinel expected by the host (false, null or -1) after logging it.

use thiserror::Error;

/// Canonical error type for the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The backend module could not be loaded.
    #[error("unable to load native-bridge backend {path}: {reason}")]
    Load { path: String, reason: String },

    /// The backend loaded but does not export the interface table.
    #[error("backend does not export {symbol}: {reason}")]
    MissingSymbol { symbol: String, reason: String },

    /// The interface symbol resolved to a null address.
    #[error("backend symbol {symbol} is null")]
    NullSymbol { symbol: String },

    /// The backend table is too old (or leaves the slot empty) for an operation.
    #[error("backend cannot serve {op}: needs v{required}, table reports v{reported}")]
    Unsupported {
        op: &'static str,
        required: u32,
        reported: u32,
    },

    /// The backend was already unloaded by the teardown hook.
    #[error("backend was unloaded at teardown")]
    TornDown,
}

/// Result alias used throughout the crate.
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Load failure helper.
    pub fn load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Symbol lookup failure helper.
    pub fn missing_symbol(symbol: impl Into<String>, reason: impl ToString) -> Self {
        Self::MissingSymbol {
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }

    pub const fn unsupported(op: &'static str, required: u32, reported: u32) -> Self {
        Self::Unsupported {
            op,
            required,
            reported,
        }
    }
}
