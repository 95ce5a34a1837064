//! jarscan - Resource and code unit discovery across jar-like archives
//!
//! This library enumerates "everything matching a predicate" across a set of
//! zip-based archives without loading any archive as a whole.
//!
//! # Components
//!
//! - [`location`]: normalizes raw URLs (nested-archive wrappers, directories)
//! - [`archive`]: forward-only entry streaming and entry classification
//! - [`filter`]: caller-supplied acceptance predicates
//! - [`registry`]: per-archive loading contexts, mutable at runtime
//! - [`loader`]: the injected code materialization capability
//! - [`scanner`]: the orchestrator tying the above together
//! - [`classpath`]: builds the location list from a classpath variable
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use jarscan::classpath::Classpath;
//! use jarscan::config::DEFAULT_CLASSPATH_VAR;
//! use jarscan::loader::{CodeLoader, MaterializeError};
//! use jarscan::registry::ContextRegistry;
//! use jarscan::scanner::ArchiveScanner;
//!
//! struct Names;
//!
//! impl CodeLoader for Names {
//!     type Context = ();
//!     type Unit = String;
//!
//!     fn materialize(&self, name: &str, _: &()) -> Result<String, MaterializeError> {
//!         Ok(name.to_string())
//!     }
//! }
//!
//! let registry = Arc::new(ContextRegistry::new(()));
//! let locations = Classpath::from_env(DEFAULT_CLASSPATH_VAR).locations(&[], registry.as_ref())?;
//!
//! let scanner = ArchiveScanner::new(Names, registry);
//! let configs = scanner.scan_resources(&|_: &str, name: &str| name.ends_with(".xml"), &locations)?;
//! let handlers = scanner.scan_code_units(&|pkg: &str, _: &str| pkg.starts_with("com.acme"), &locations)?;
//! # Ok::<(), jarscan::error::ScanError>(())
//! ```

pub mod archive;
pub mod classpath;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod location;
pub mod registry;
pub mod scanner;

#[cfg(test)]
mod test_support;

pub use error::{ScanError, ScanResult};
pub use scanner::ArchiveScanner;
