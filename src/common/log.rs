//! Diagnostic sink behind the `log` facade.
//!
//! On Android records go to the platform log under [`LOG_TAG`]; host builds use
//! `env_logger`. Installation is idempotent and never fails the caller.

use std::sync::Once;

use log::LevelFilter;

/// Tag used for every platform log line.
pub const LOG_TAG: &str = "NativeBridgeProxy";

static INIT: Once = Once::new();

/// Install the process logger once. Later calls are no-ops.
pub fn init(level: LevelFilter) {
    INIT.call_once(|| install(level));
}

#[cfg(target_os = "android")]
fn install(level: LevelFilter) {
    if log::set_logger(&android::SINK).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(not(target_os = "android"))]
fn install(level: LevelFilter) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

#[cfg(target_os = "android")]
mod android {
    use std::ffi::CString;
    use std::os::raw::{c_char, c_int};

    use log::{Level, Log, Metadata, Record};

    use super::LOG_TAG;

    const ANDROID_LOG_DEBUG: c_int = 3;
    const ANDROID_LOG_INFO: c_int = 4;
    const ANDROID_LOG_WARN: c_int = 5;
    const ANDROID_LOG_ERROR: c_int = 6;

    #[link(name = "log")]
    extern "C" {
        fn __android_log_write(prio: c_int, tag: *const c_char, text: *const c_char) -> c_int;
    }

    pub(super) static SINK: PlatformLog = PlatformLog;

    pub(super) struct PlatformLog;

    impl Log for PlatformLog {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let prio = match record.level() {
                Level::Error => ANDROID_LOG_ERROR,
                Level::Warn => ANDROID_LOG_WARN,
                Level::Info => ANDROID_LOG_INFO,
                Level::Debug | Level::Trace => ANDROID_LOG_DEBUG,
            };
            let text = record.args().to_string().replace('\0', "\\0");
            let (Ok(tag), Ok(text)) = (CString::new(LOG_TAG), CString::new(text)) else {
                return;
            };
            unsafe {
                __android_log_write(prio, tag.as_ptr(), text.as_ptr());
            }
        }

        fn flush(&self) {}
    }
}
