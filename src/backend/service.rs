//! Backend resolution: find, load and memoize the backend's interface table.
//!
//! Discovery (property read, path build, load, symbol lookup) runs at most
//! once per resolver, guarded by a `OnceLock`. A failed discovery is cached as
//! well and never retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use parking_lot::Mutex;

use crate::common::config::BridgeCfg;
use crate::common::error::{BridgeError, BridgeResult};

use super::domain::{BackendItf, LoadedModule, ModuleLoader, PropertySource, TableSource};
use super::loader_dl::DlLoader;
use super::props::SystemProperties;

/// Owns the backend module and the memoized interface table.
pub struct Resolver<L = DlLoader, P = SystemProperties> {
    cfg: BridgeCfg,
    loader: L,
    props: P,
    resolved: OnceLock<Option<BackendItf>>,
    module: Mutex<Option<Box<dyn LoadedModule>>>,
    torn_down: AtomicBool,
}

impl<L: ModuleLoader, P: PropertySource> Resolver<L, P> {
    pub fn new(cfg: BridgeCfg, loader: L, props: P) -> Self {
        Self {
            cfg,
            loader,
            props,
            resolved: OnceLock::new(),
            module: Mutex::new(None),
            torn_down: AtomicBool::new(false),
        }
    }

    pub fn cfg(&self) -> &BridgeCfg {
        &self.cfg
    }

    /// The backend table, discovering it on first use.
    pub fn resolve(&self) -> Option<BackendItf> {
        if self.torn_down.load(Ordering::Acquire) {
            log::debug!("[-] {}", BridgeError::TornDown);
            return None;
        }
        *self.resolved.get_or_init(|| match self.discover() {
            Ok(itf) => {
                log::info!(
                    "[=] Found native-bridge handle:{:p} version:{}",
                    itf.as_ptr(),
                    itf.version()
                );
                Some(itf)
            }
            Err(err) => {
                log::error!("[-] {err}");
                None
            }
        })
    }

    fn discover(&self) -> BridgeResult<BackendItf> {
        let name = self.props.get(&self.cfg.property_key);
        let path = self.cfg.backend_path(name.as_deref());
        log::debug!("[=] Loading native-bridge backend {path}");

        let module = self.loader.load(&path)?;
        let mut slot = self.module.lock();
        let module = slot.insert(module);
        let sym = module.data_symbol(&self.cfg.itf_symbol)?;

        // The symbol is the backend's exported table, alive while the module is.
        Ok(unsafe { BackendItf::from_raw(sym.cast()) })
    }

    /// Whether a backend module is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.module.lock().is_some()
    }

    /// Unload the backend, if any. Later resolutions yield `None`.
    pub fn teardown(&self) {
        self.torn_down.store(true, Ordering::Release);
        if let Some(module) = self.module.lock().take() {
            log::debug!("[=] Unloading native-bridge backend");
            drop(module);
        }
    }
}

impl<L: ModuleLoader, P: PropertySource> TableSource for Resolver<L, P> {
    fn table(&self) -> Option<BackendItf> {
        self.resolve()
    }
}

static GLOBAL: OnceLock<Resolver> = OnceLock::new();

/// Process-wide resolver, created on first use.
pub fn global() -> &'static Resolver {
    GLOBAL.get_or_init(|| {
        let cfg = BridgeCfg::load();
        crate::common::log::init(cfg.log_level);
        Resolver::new(cfg, DlLoader, SystemProperties)
    })
}

/// Tear down the process-wide resolver if it was ever created.
pub fn teardown_global() {
    if let Some(resolver) = GLOBAL.get() {
        resolver.teardown();
    }
}
