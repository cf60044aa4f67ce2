//! ABI types shared with the host runtime and the backend.
//!
//! Field order and representation follow the host's `NativeBridgeCallbacks`
//! contract and must not change. Every function slot is an `Option` so a
//! backend that leaves a slot null is representable without UB.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};

/// Highest protocol revision this shim implements.
pub const BRIDGE_VERSION: u32 = 4;

/// Runtime callbacks handed to `initialize`. Passed through uninterpreted.
#[repr(C)]
pub struct RuntimeCallbacks {
    _private: [u8; 0],
}

/// Backend-defined namespace token. Passed through uninterpreted.
#[repr(C)]
pub struct Namespace {
    _private: [u8; 0],
}

/// Environment values a backend reports for an ABI.
#[repr(C)]
pub struct RuntimeValues {
    pub os_arch: *const c_char,
    pub cpu_abi: *const c_char,
    pub cpu_abi2: *const c_char,
    pub supported_abis: *const *const c_char,
    pub abi_count: i32,
}

/// Signal handler a backend can install for guest code.
pub type SignalHandlerFn =
    Option<unsafe extern "C" fn(signal: c_int, info: *mut c_void, context: *mut c_void) -> bool>;

pub type InitializeFn = unsafe extern "C" fn(
    runtime_cbs: *const RuntimeCallbacks,
    private_dir: *const c_char,
    isa: *const c_char,
) -> bool;
pub type LoadLibraryFn = unsafe extern "C" fn(libpath: *const c_char, flag: c_int) -> *mut c_void;
pub type GetTrampolineFn = unsafe extern "C" fn(
    handle: *mut c_void,
    name: *const c_char,
    shorty: *const c_char,
    len: u32,
) -> *mut c_void;
pub type IsSupportedFn = unsafe extern "C" fn(libpath: *const c_char) -> bool;
pub type GetAppEnvFn = unsafe extern "C" fn(abi: *const c_char) -> *const RuntimeValues;
pub type IsCompatibleWithFn = unsafe extern "C" fn(version: u32) -> bool;
pub type GetSignalHandlerFn = unsafe extern "C" fn(signal: c_int) -> SignalHandlerFn;
pub type UnloadLibraryFn = unsafe extern "C" fn(handle: *mut c_void) -> c_int;
pub type GetErrorFn = unsafe extern "C" fn() -> *const c_char;
pub type IsPathSupportedFn = unsafe extern "C" fn(path: *const c_char) -> bool;
pub type InitAnonymousNamespaceFn = unsafe extern "C" fn(
    public_ns_sonames: *const c_char,
    anon_ns_library_path: *const c_char,
) -> bool;
pub type CreateNamespaceFn = unsafe extern "C" fn(
    name: *const c_char,
    ld_library_path: *const c_char,
    default_library_path: *const c_char,
    kind: u64,
    permitted_when_isolated_path: *const c_char,
    parent: *mut Namespace,
) -> *mut Namespace;
pub type LinkNamespacesFn = unsafe extern "C" fn(
    from: *mut Namespace,
    to: *mut Namespace,
    shared_libs_sonames: *const c_char,
) -> bool;
pub type LoadLibraryExtFn =
    unsafe extern "C" fn(libpath: *const c_char, flag: c_int, ns: *mut Namespace) -> *mut c_void;
pub type GetVendorNamespaceFn = unsafe extern "C" fn() -> *mut Namespace;
pub type GetExportedNamespaceFn = unsafe extern "C" fn(name: *const c_char) -> *mut Namespace;

/// The versioned interface table.
#[repr(C)]
pub struct NativeBridgeCallbacks {
    pub version: u32,
    // v1
    pub initialize: Option<InitializeFn>,
    pub load_library: Option<LoadLibraryFn>,
    pub get_trampoline: Option<GetTrampolineFn>,
    pub is_supported: Option<IsSupportedFn>,
    pub get_app_env: Option<GetAppEnvFn>,
    // v2
    pub is_compatible_with: Option<IsCompatibleWithFn>,
    pub get_signal_handler: Option<GetSignalHandlerFn>,
    // v3
    pub unload_library: Option<UnloadLibraryFn>,
    pub get_error: Option<GetErrorFn>,
    pub is_path_supported: Option<IsPathSupportedFn>,
    pub init_anonymous_namespace: Option<InitAnonymousNamespaceFn>,
    pub create_namespace: Option<CreateNamespaceFn>,
    pub link_namespaces: Option<LinkNamespacesFn>,
    pub load_library_ext: Option<LoadLibraryExtFn>,
    // v4
    pub get_vendor_namespace: Option<GetVendorNamespaceFn>,
    pub get_exported_namespace: Option<GetExportedNamespaceFn>,
}

/// Protocol revision that introduced an operation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum Revision {
    V1 = 1,
    V2 = 2,
    V3 = 3,
    V4 = 4,
}

impl NativeBridgeCallbacks {
    /// Whether this table is recent enough to carry an operation of `rev`.
    pub fn supports(&self, rev: Revision) -> bool {
        self.version >= rev as u32
    }
}
