//! Dynamic-linker backed module loader.

use std::ffi::c_void;
use std::ptr::NonNull;

use libloading::os::unix::{Library, RTLD_LAZY};

use crate::common::error::{BridgeError, BridgeResult};

use super::domain::{LoadedModule, ModuleLoader};

/// Loads modules through `dlopen`, resolving symbols lazily so incidental
/// unresolved references inside the backend do not fail the load.
#[derive(Default)]
pub struct DlLoader;

struct DlModule {
    lib: Library,
}

impl ModuleLoader for DlLoader {
    fn load(&self, path: &str) -> BridgeResult<Box<dyn LoadedModule>> {
        let lib = unsafe { Library::open(Some(path), RTLD_LAZY) }
            .map_err(|err| BridgeError::load(path, err))?;
        Ok(Box::new(DlModule { lib }))
    }
}

impl LoadedModule for DlModule {
    fn data_symbol(&self, name: &str) -> BridgeResult<NonNull<c_void>> {
        let sym = unsafe { self.lib.get::<*mut c_void>(name.as_bytes()) }
            .map_err(|err| BridgeError::missing_symbol(name, err))?;
        NonNull::new(*sym).ok_or_else(|| BridgeError::NullSymbol {
            symbol: name.to_string(),
        })
    }
}
