//! System property access.
//!
//! Android reads the property service; other targets read an environment
//! variable derived from the key so the shim can run on a host.

use super::domain::PropertySource;

#[derive(Default)]
pub struct SystemProperties;

impl PropertySource for SystemProperties {
    #[cfg(target_os = "android")]
    fn get(&self, key: &str) -> Option<String> {
        use std::ffi::{CStr, CString};

        let key = CString::new(key).ok()?;
        let mut value = [0 as libc::c_char; libc::PROP_VALUE_MAX as usize];
        let len = unsafe { libc::__system_property_get(key.as_ptr(), value.as_mut_ptr()) };
        if len <= 0 {
            return None;
        }
        let value = unsafe { CStr::from_ptr(value.as_ptr()) };
        Some(value.to_string_lossy().into_owned())
    }

    #[cfg(not(target_os = "android"))]
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(env_key(key)).ok()
    }
}

/// `ro.dalvik.vm.native.bridge` -> `RO_DALVIK_VM_NATIVE_BRIDGE`
pub fn env_key(key: &str) -> String {
    key.chars()
        .map(|ch| match ch {
            'a'..='z' => ch.to_ascii_uppercase(),
            'A'..='Z' | '0'..='9' => ch,
            _ => '_',
        })
        .collect()
}
