//! Bridge domain: the interface table the host runtime calls into.

pub mod domain;
pub mod init;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::{NativeBridgeCallbacks, BRIDGE_VERSION};
pub use service::Forwarder;
