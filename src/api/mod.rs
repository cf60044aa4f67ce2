//! Entry points exposed to the host runtime.

pub mod ffi;
