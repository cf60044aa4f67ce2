//! Runtime configuration for backend discovery and diagnostics.
//!
//! Discovery constants are fixed by the platform; only the log level can be
//! tuned from the process environment.

use std::env;

use log::LevelFilter;

/// System property holding the backend override name.
pub const BACKEND_PROPERTY: &str = "ro.dalvik.vm.native.bridge";

/// Backend loaded when the property is absent or empty.
pub const DEFAULT_BACKEND: &str = "libhoudini.so";

/// Exported symbol naming the interface table, both ours and the backend's.
pub const ITF_SYMBOL: &str = "NativeBridgeItf";

/// Environment variable selecting the diagnostic level.
pub const LOG_LEVEL_ENV: &str = "NBPROXY_LOG_LEVEL";

#[cfg(target_pointer_width = "64")]
pub const SYSTEM_LIB_DIR: &str = "/system/lib64";

#[cfg(not(target_pointer_width = "64"))]
pub const SYSTEM_LIB_DIR: &str = "/system/lib";

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeCfg {
    pub property_key: String,
    pub default_backend: String,
    pub system_lib_dir: String,
    pub itf_symbol: String,
    pub log_level: LevelFilter,
}

impl Default for BridgeCfg {
    fn default() -> Self {
        Self {
            property_key: BACKEND_PROPERTY.to_string(),
            default_backend: DEFAULT_BACKEND.to_string(),
            system_lib_dir: SYSTEM_LIB_DIR.to_string(),
            itf_symbol: ITF_SYMBOL.to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl BridgeCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        let log_level = env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|raw| parse_level(&raw))
            .unwrap_or(LevelFilter::Info);

        Self {
            log_level,
            ..Self::default()
        }
    }

    /// Full path of the backend module for the given property value.
    ///
    /// An absent or empty override selects the default backend. The name is
    /// used verbatim and appended to the system library directory.
    pub fn backend_path(&self, override_name: Option<&str>) -> String {
        let name = match override_name {
            Some(name) if !name.is_empty() => name,
            _ => self.default_backend.as_str(),
        };
        format!("{}/{}", self.system_lib_dir, name)
    }
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    raw.trim().parse().ok()
}
