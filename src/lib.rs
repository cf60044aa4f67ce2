//! Native-bridge proxy: exports the host's bridge interface and forwards every
//! call to a vendor translation backend discovered at first use.
pub mod api;
pub mod backend;
pub mod bridge;
pub mod common;

pub use api::ffi::NativeBridgeItf;
