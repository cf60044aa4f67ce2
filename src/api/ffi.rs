//! C-compatible interface table consumed by the host runtime.
//!
//! The only exported symbol is [`NativeBridgeItf`]. Every slot forwards to the
//! process-wide resolver; none of them unwinds into the host.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};

use crate::backend::service;
use crate::bridge::domain::{
    Namespace, NativeBridgeCallbacks, RuntimeCallbacks, RuntimeValues, SignalHandlerFn,
    BRIDGE_VERSION,
};
use crate::bridge::service::Forwarder;

fn forwarder() -> Forwarder<'static, service::Resolver> {
    Forwarder::new(service::global())
}

/// Interface table looked up by the host runtime. Name and layout are fixed.
#[allow(non_upper_case_globals)]
#[no_mangle]
pub static NativeBridgeItf: NativeBridgeCallbacks = NativeBridgeCallbacks {
    version: BRIDGE_VERSION,
    // v1
    initialize: Some(initialize),
    load_library: Some(load_library),
    get_trampoline: Some(get_trampoline),
    is_supported: Some(is_supported),
    get_app_env: Some(get_app_env),
    // v2
    is_compatible_with: Some(is_compatible_with),
    get_signal_handler: Some(get_signal_handler),
    // v3
    unload_library: Some(unload_library),
    get_error: Some(get_error),
    is_path_supported: Some(is_path_supported),
    init_anonymous_namespace: Some(init_anonymous_namespace),
    create_namespace: Some(create_namespace),
    link_namespaces: Some(link_namespaces),
    load_library_ext: Some(load_library_ext),
    // v4
    get_vendor_namespace: Some(get_vendor_namespace),
    get_exported_namespace: Some(get_exported_namespace),
};

unsafe extern "C" fn initialize(
    runtime_cbs: *const RuntimeCallbacks,
    private_dir: *const c_char,
    isa: *const c_char,
) -> bool {
    forwarder().initialize(runtime_cbs, private_dir, isa)
}

unsafe extern "C" fn load_library(libpath: *const c_char, flag: c_int) -> *mut c_void {
    forwarder().load_library(libpath, flag)
}

unsafe extern "C" fn get_trampoline(
    handle: *mut c_void,
    name: *const c_char,
    shorty: *const c_char,
    len: u32,
) -> *mut c_void {
    forwarder().get_trampoline(handle, name, shorty, len)
}

unsafe extern "C" fn is_supported(libpath: *const c_char) -> bool {
    forwarder().is_supported(libpath)
}

unsafe extern "C" fn get_app_env(abi: *const c_char) -> *const RuntimeValues {
    forwarder().get_app_env(abi)
}

unsafe extern "C" fn is_compatible_with(version: u32) -> bool {
    forwarder().is_compatible_with(version)
}

unsafe extern "C" fn get_signal_handler(signal: c_int) -> SignalHandlerFn {
    forwarder().get_signal_handler(signal)
}

unsafe extern "C" fn unload_library(handle: *mut c_void) -> c_int {
    forwarder().unload_library(handle)
}

unsafe extern "C" fn get_error() -> *const c_char {
    forwarder().get_error()
}

unsafe extern "C" fn is_path_supported(path: *const c_char) -> bool {
    forwarder().is_path_supported(path)
}

unsafe extern "C" fn init_anonymous_namespace(
    public_ns_sonames: *const c_char,
    anon_ns_library_path: *const c_char,
) -> bool {
    forwarder().init_anonymous_namespace(public_ns_sonames, anon_ns_library_path)
}

unsafe extern "C" fn create_namespace(
    name: *const c_char,
    ld_library_path: *const c_char,
    default_library_path: *const c_char,
    kind: u64,
    permitted_when_isolated_path: *const c_char,
    parent: *mut Namespace,
) -> *mut Namespace {
    forwarder().create_namespace(
        name,
        ld_library_path,
        default_library_path,
        kind,
        permitted_when_isolated_path,
        parent,
    )
}

unsafe extern "C" fn link_namespaces(
    from: *mut Namespace,
    to: *mut Namespace,
    shared_libs_sonames: *const c_char,
) -> bool {
    forwarder().link_namespaces(from, to, shared_libs_sonames)
}

unsafe extern "C" fn load_library_ext(
    libpath: *const c_char,
    flag: c_int,
    ns: *mut Namespace,
) -> *mut c_void {
    forwarder().load_library_ext(libpath, flag, ns)
}

unsafe extern "C" fn get_vendor_namespace() -> *mut Namespace {
    forwarder().get_vendor_namespace()
}

unsafe extern "C" fn get_exported_namespace(name: *const c_char) -> *mut Namespace {
    forwarder().get_exported_namespace(name)
}

/// Unloads the backend when this module is unloaded or the process exits.
extern "C" fn teardown() {
    service::teardown_global();
}

#[cfg(any(target_os = "linux", target_os = "android"))]
#[used]
#[link_section = ".fini_array"]
static TEARDOWN: extern "C" fn() = teardown;
