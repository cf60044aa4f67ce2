//! Forwarding of every bridge operation to the resolved backend.
//!
//! Each operation resolves the backend table and calls the matching slot with
//! the caller's arguments unchanged. Without a usable backend the operation
//! returns its failure sentinel: `false`, null, or `-1` for `unload_library`.
//! Only `initialize` adds policy, see [`super::init`].

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};
use std::ptr;

use crate::backend::domain::{BackendItf, TableSource};
use crate::common::cstr;
use crate::common::error::{BridgeError, BridgeResult};

use super::domain::{
    Namespace, NativeBridgeCallbacks, Revision, RuntimeCallbacks, RuntimeValues, SignalHandlerFn,
};
use super::init::{self, Attempt};

/// Sentinel returned by `unload_library` when no backend can serve it.
pub const UNLOAD_FAILED: c_int = -1;

pub struct Forwarder<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: TableSource + ?Sized> Forwarder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    fn backend(&self) -> Option<BackendItf> {
        let itf = self.source.table();
        if itf.is_none() {
            log::debug!("[-] No native-bridge backend available");
        }
        itf
    }

    /// Pick a slot out of the backend table, enforcing its revision.
    fn slot<T>(
        &self,
        op: &'static str,
        rev: Revision,
        pick: impl FnOnce(&NativeBridgeCallbacks) -> Option<T>,
    ) -> Option<T> {
        let itf = self.backend()?;
        match checked(itf.callbacks(), op, rev, pick) {
            Ok(f) => Some(f),
            Err(err) => {
                log::error!("[-] {err}");
                None
            }
        }
    }

    /// # Safety
    /// Pointer arguments must satisfy the host contract for `initialize`.
    pub unsafe fn initialize(
        &self,
        runtime_cbs: *const RuntimeCallbacks,
        private_dir: *const c_char,
        isa: *const c_char,
    ) -> bool {
        let Some(initialize) = self.slot("initialize", Revision::V1, |t| t.initialize) else {
            return false;
        };
        init::run(isa, |isa, which| {
            if which == Attempt::Hijack {
                log::error!(
                    "[-] [Initialize] Tried default params failed, also hijack to {:p} {} {}",
                    runtime_cbs,
                    cstr::display(private_dir),
                    cstr::display(isa)
                );
            }
            initialize(runtime_cbs, private_dir, isa)
        })
    }

    /// # Safety
    /// Arguments are passed to the backend unchanged.
    pub unsafe fn load_library(&self, libpath: *const c_char, flag: c_int) -> *mut c_void {
        match self.slot("loadLibrary", Revision::V1, |t| t.load_library) {
            Some(f) => f(libpath, flag),
            None => ptr::null_mut(),
        }
    }

    /// # Safety
    /// Arguments are passed to the backend unchanged.
    pub unsafe fn get_trampoline(
        &self,
        handle: *mut c_void,
        name: *const c_char,
        shorty: *const c_char,
        len: u32,
    ) -> *mut c_void {
        match self.slot("getTrampoline", Revision::V1, |t| t.get_trampoline) {
            Some(f) => f(handle, name, shorty, len),
            None => ptr::null_mut(),
        }
    }

    /// # Safety
    /// Arguments are passed to the backend unchanged.
    pub unsafe fn is_supported(&self, libpath: *const c_char) -> bool {
        match self.slot("isSupported", Revision::V1, |t| t.is_supported) {
            Some(f) => f(libpath),
            None => false,
        }
    }

    /// # Safety
    /// Arguments are passed to the backend unchanged.
    pub unsafe fn get_app_env(&self, abi: *const c_char) -> *const RuntimeValues {
        match self.slot("getAppEnv", Revision::V1, |t| t.get_app_env) {
            Some(f) => f(abi),
            None => ptr::null(),
        }
    }

    /// # Safety
    /// Calls into the backend.
    pub unsafe fn is_compatible_with(&self, version: u32) -> bool {
        match self.slot("isCompatibleWith", Revision::V2, |t| t.is_compatible_with) {
            Some(f) => f(version),
            None => false,
        }
    }

    /// # Safety
    /// Calls into the backend.
    pub unsafe fn get_signal_handler(&self, signal: c_int) -> SignalHandlerFn {
        match self.slot("getSignalHandler", Revision::V2, |t| t.get_signal_handler) {
            Some(f) => f(signal),
            None => None,
        }
    }

    /// # Safety
    /// `handle` must come from this backend.
    pub unsafe fn unload_library(&self, handle: *mut c_void) -> c_int {
        match self.slot("unloadLibrary", Revision::V3, |t| t.unload_library) {
            Some(f) => f(handle),
            None => UNLOAD_FAILED,
        }
    }

    /// # Safety
    /// Calls into the backend.
    pub unsafe fn get_error(&self) -> *const c_char {
        match self.slot("getError", Revision::V3, |t| t.get_error) {
            Some(f) => f(),
            None => ptr::null(),
        }
    }

    /// # Safety
    /// Arguments are passed to the backend unchanged.
    pub unsafe fn is_path_supported(&self, path: *const c_char) -> bool {
        match self.slot("isPathSupported", Revision::V3, |t| t.is_path_supported) {
            Some(f) => f(path),
            None => false,
        }
    }

    /// # Safety
    /// Arguments are passed to the backend unchanged.
    pub unsafe fn init_anonymous_namespace(
        &self,
        public_ns_sonames: *const c_char,
        anon_ns_library_path: *const c_char,
    ) -> bool {
        match self.slot("initAnonymousNamespace", Revision::V3, |t| t.init_anonymous_namespace) {
            Some(f) => f(public_ns_sonames, anon_ns_library_path),
            None => false,
        }
    }

    /// # Safety
    /// Arguments are passed to the backend unchanged.
    pub unsafe fn create_namespace(
        &self,
        name: *const c_char,
        ld_library_path: *const c_char,
        default_library_path: *const c_char,
        kind: u64,
        permitted_when_isolated_path: *const c_char,
        parent: *mut Namespace,
    ) -> *mut Namespace {
        match self.slot("createNamespace", Revision::V3, |t| t.create_namespace) {
            Some(f) => f(
                name,
                ld_library_path,
                default_library_path,
                kind,
                permitted_when_isolated_path,
                parent,
            ),
            None => ptr::null_mut(),
        }
    }

    /// # Safety
    /// Namespaces must come from this backend.
    pub unsafe fn link_namespaces(
        &self,
        from: *mut Namespace,
        to: *mut Namespace,
        shared_libs_sonames: *const c_char,
    ) -> bool {
        match self.slot("linkNamespaces", Revision::V3, |t| t.link_namespaces) {
            Some(f) => f(from, to, shared_libs_sonames),
            None => false,
        }
    }

    /// # Safety
    /// Arguments are passed to the backend unchanged.
    pub unsafe fn load_library_ext(
        &self,
        libpath: *const c_char,
        flag: c_int,
        ns: *mut Namespace,
    ) -> *mut c_void {
        match self.slot("loadLibraryExt", Revision::V3, |t| t.load_library_ext) {
            Some(f) => f(libpath, flag, ns),
            None => ptr::null_mut(),
        }
    }

    /// # Safety
    /// Calls into the backend.
    pub unsafe fn get_vendor_namespace(&self) -> *mut Namespace {
        match self.slot("getVendorNamespace", Revision::V4, |t| t.get_vendor_namespace) {
            Some(f) => f(),
            None => ptr::null_mut(),
        }
    }

    /// # Safety
    /// Arguments are passed to the backend unchanged.
    pub unsafe fn get_exported_namespace(&self, name: *const c_char) -> *mut Namespace {
        match self.slot("getExportedNamespace", Revision::V4, |t| t.get_exported_namespace) {
            Some(f) => f(name),
            None => ptr::null_mut(),
        }
    }
}

fn checked<T>(
    table: &NativeBridgeCallbacks,
    op: &'static str,
    rev: Revision,
    pick: impl FnOnce(&NativeBridgeCallbacks) -> Option<T>,
) -> BridgeResult<T> {
    if !table.supports(rev) {
        return Err(BridgeError::unsupported(op, rev as u32, table.version));
    }
    pick(table).ok_or_else(|| BridgeError::unsupported(op, rev as u32, table.version))
}
