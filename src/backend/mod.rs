//! Backend domain: locating, loading and caching the translation backend.

pub mod domain;
pub mod loader_dl;
pub mod props;
pub mod service;


pub use domain::{BackendItf, LoadedModule, ModuleLoader, PropertySource, TableSource};
pub use service::Resolver;
