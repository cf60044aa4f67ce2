//! Recording backend used by forwarding and resolver tests.
//!
//! The backend's functions are plain `extern "C"` items, so calls are recorded
//! in process-wide state. Tests that inspect it hold [`lock`], which also
//! resets the recording.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};
use std::ptr::NonNull;

use parking_lot::{const_mutex, Mutex, MutexGuard};

use crate::backend::domain::{BackendItf, TableSource};
use crate::common::cstr::display;

use super::domain::{
    Namespace, NativeBridgeCallbacks, RuntimeCallbacks, RuntimeValues, SignalHandlerFn,
};

pub const LIB_HANDLE: usize = 0x5000;
pub const TRAMPOLINE: usize = 0x6000;
pub const VENDOR_NS: usize = 0x7000;
pub const CREATED_NS: usize = 0x8000;
pub const RUNTIME_CBS: usize = 0x9000;
const APP_ENV: usize = 0xa000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Initialize(usize, String, String),
    LoadLibrary(String, c_int),
    GetTrampoline(usize, String, String, u32),
    IsSupported(String),
    GetAppEnv(String),
    IsCompatibleWith(u32),
    GetSignalHandler(c_int),
    UnloadLibrary(usize),
    GetError,
    IsPathSupported(String),
    InitAnonymousNamespace(String, String),
    CreateNamespace(String, u64, usize),
    LinkNamespaces(usize, usize),
    LoadLibraryExt(String, c_int, usize),
    GetVendorNamespace,
    GetExportedNamespace(String),
}

#[derive(Default)]
struct Recording {
    calls: Vec<Call>,
    accepted_isas: Vec<String>,
}

static SERIAL: Mutex<()> = const_mutex(());
static RECORDING: Mutex<Recording> = const_mutex(Recording {
    calls: Vec::new(),
    accepted_isas: Vec::new(),
});

/// Serialize a test against the recording backend and clear its state.
pub fn lock() -> MutexGuard<'static, ()> {
    let guard = SERIAL.lock();
    *RECORDING.lock() = Recording::default();
    guard
}

pub fn calls() -> Vec<Call> {
    RECORDING.lock().calls.clone()
}

/// Instruction sets the fake `initialize` accepts.
pub fn set_accepted_isas(isas: &[&str]) {
    RECORDING.lock().accepted_isas = isas.iter().map(|s| s.to_string()).collect();
}

fn record(call: Call) {
    RECORDING.lock().calls.push(call);
}

fn text(ptr: *const c_char) -> String {
    unsafe { display(ptr) }.into_owned()
}

unsafe extern "C" fn initialize(
    cbs: *const RuntimeCallbacks,
    dir: *const c_char,
    isa: *const c_char,
) -> bool {
    let isa = text(isa);
    record(Call::Initialize(cbs as usize, text(dir), isa.clone()));
    RECORDING.lock().accepted_isas.contains(&isa)
}

unsafe extern "C" fn load_library(path: *const c_char, flag: c_int) -> *mut c_void {
    record(Call::LoadLibrary(text(path), flag));
    LIB_HANDLE as *mut c_void
}

unsafe extern "C" fn get_trampoline(
    handle: *mut c_void,
    name: *const c_char,
    shorty: *const c_char,
    len: u32,
) -> *mut c_void {
    record(Call::GetTrampoline(handle as usize, text(name), text(shorty), len));
    TRAMPOLINE as *mut c_void
}

unsafe extern "C" fn is_supported(path: *const c_char) -> bool {
    record(Call::IsSupported(text(path)));
    true
}

unsafe extern "C" fn get_app_env(abi: *const c_char) -> *const RuntimeValues {
    record(Call::GetAppEnv(text(abi)));
    APP_ENV as *const RuntimeValues
}

unsafe extern "C" fn is_compatible_with(version: u32) -> bool {
    record(Call::IsCompatibleWith(version));
    true
}

unsafe extern "C" fn guest_signal(_signal: c_int, _info: *mut c_void, _ctx: *mut c_void) -> bool {
    false
}

unsafe extern "C" fn get_signal_handler(signal: c_int) -> SignalHandlerFn {
    record(Call::GetSignalHandler(signal));
    Some(guest_signal)
}

unsafe extern "C" fn unload_library(handle: *mut c_void) -> c_int {
    record(Call::UnloadLibrary(handle as usize));
    0
}

unsafe extern "C" fn get_error() -> *const c_char {
    record(Call::GetError);
    c"backend error".as_ptr()
}

unsafe extern "C" fn is_path_supported(path: *const c_char) -> bool {
    record(Call::IsPathSupported(text(path)));
    true
}

unsafe extern "C" fn init_anonymous_namespace(sonames: *const c_char, path: *const c_char) -> bool {
    record(Call::InitAnonymousNamespace(text(sonames), text(path)));
    true
}

unsafe extern "C" fn create_namespace(
    name: *const c_char,
    _ld_library_path: *const c_char,
    _default_library_path: *const c_char,
    kind: u64,
    _permitted: *const c_char,
    parent: *mut Namespace,
) -> *mut Namespace {
    record(Call::CreateNamespace(text(name), kind, parent as usize));
    CREATED_NS as *mut Namespace
}

unsafe extern "C" fn link_namespaces(
    from: *mut Namespace,
    to: *mut Namespace,
    _sonames: *const c_char,
) -> bool {
    record(Call::LinkNamespaces(from as usize, to as usize));
    true
}

unsafe extern "C" fn load_library_ext(
    path: *const c_char,
    flag: c_int,
    ns: *mut Namespace,
) -> *mut c_void {
    record(Call::LoadLibraryExt(text(path), flag, ns as usize));
    LIB_HANDLE as *mut c_void
}

unsafe extern "C" fn get_vendor_namespace() -> *mut Namespace {
    record(Call::GetVendorNamespace);
    VENDOR_NS as *mut Namespace
}

unsafe extern "C" fn get_exported_namespace(name: *const c_char) -> *mut Namespace {
    record(Call::GetExportedNamespace(text(name)));
    VENDOR_NS as *mut Namespace
}

/// Table with no operations.
pub const fn empty_table() -> NativeBridgeCallbacks {
    NativeBridgeCallbacks {
        version: 0,
        initialize: None,
        load_library: None,
        get_trampoline: None,
        is_supported: None,
        get_app_env: None,
        is_compatible_with: None,
        get_signal_handler: None,
        unload_library: None,
        get_error: None,
        is_path_supported: None,
        init_anonymous_namespace: None,
        create_namespace: None,
        link_namespaces: None,
        load_library_ext: None,
        get_vendor_namespace: None,
        get_exported_namespace: None,
    }
}

const fn recording_table(version: u32) -> NativeBridgeCallbacks {
    NativeBridgeCallbacks {
        version,
        initialize: Some(initialize),
        load_library: Some(load_library),
        get_trampoline: Some(get_trampoline),
        is_supported: Some(is_supported),
        get_app_env: Some(get_app_env),
        is_compatible_with: Some(is_compatible_with),
        get_signal_handler: Some(get_signal_handler),
        unload_library: Some(unload_library),
        get_error: Some(get_error),
        is_path_supported: Some(is_path_supported),
        init_anonymous_namespace: Some(init_anonymous_namespace),
        create_namespace: Some(create_namespace),
        link_namespaces: Some(link_namespaces),
        load_library_ext: Some(load_library_ext),
        get_vendor_namespace: Some(get_vendor_namespace),
        get_exported_namespace: Some(get_exported_namespace),
    }
}

/// A v4 backend implementing every operation.
pub static BACKEND_TABLE: NativeBridgeCallbacks = recording_table(4);

/// A backend reporting v2 even though later slots are filled.
pub static V2_TABLE: NativeBridgeCallbacks = recording_table(2);

/// Table source returning a fixed answer.
pub struct Fixed(pub Option<BackendItf>);

impl Fixed {
    pub fn of(table: &'static NativeBridgeCallbacks) -> Self {
        Self(Some(unsafe { BackendItf::from_raw(NonNull::from(table)) }))
    }
}

impl TableSource for Fixed {
    fn table(&self) -> Option<BackendItf> {
        self.0
    }
}
