//! Contracts for locating and loading the translation backend.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

use crate::bridge::domain::NativeBridgeCallbacks;
use crate::common::error::BridgeResult;

/// A loaded backend module. Dropping it unloads the module.
pub trait LoadedModule: Send + Sync {
    /// Address of an exported data symbol.
    fn data_symbol(&self, name: &str) -> BridgeResult<NonNull<c_void>>;
}

/// Capability to load modules by path.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &str) -> BridgeResult<Box<dyn LoadedModule>>;
}

/// Read access to system configuration properties.
pub trait PropertySource: Send + Sync {
    /// Value of `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// Anything that can hand out the backend's interface table.
pub trait TableSource {
    fn table(&self) -> Option<BackendItf>;
}

/// Pointer to the backend's own interface table.
///
/// The memory belongs to the loaded module and stays valid until the module
/// is unloaded at teardown.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct BackendItf(NonNull<NativeBridgeCallbacks>);

// The table is immutable data exported by the backend.
unsafe impl Send for BackendItf {}
unsafe impl Sync for BackendItf {}

impl BackendItf {
    /// # Safety
    /// `ptr` must point to a table that outlives every use of the returned handle.
    pub unsafe fn from_raw(ptr: NonNull<NativeBridgeCallbacks>) -> Self {
        Self(ptr)
    }

    pub fn as_ptr(&self) -> *const NativeBridgeCallbacks {
        self.0.as_ptr()
    }

    pub fn callbacks(&self) -> &NativeBridgeCallbacks {
        unsafe { self.0.as_ref() }
    }

    pub fn version(&self) -> u32 {
        self.callbacks().version
    }
}

impl fmt::Debug for BackendItf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BackendItf({:p}, v{})", self.0, self.version())
    }
}
