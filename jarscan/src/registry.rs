//! Loading-context registry.
//!
//! Bootstrap code that mounts archives outside the normal classpath (plugins,
//! for instance) registers the context those archives must be loaded through.
//! The scanner consults the registry only when materializing code units and
//! falls back to the registry's default context for unregistered archives.
//!
//! The registry is an explicitly owned value, shared via `Arc`, rather than
//! process-global state. Individual operations are atomic per key; there is no
//! ordering between operations on different keys.
//!
//! # Example
//!
//! ```
//! use jarscan::location::ArchiveLocation;
//! use jarscan::registry::ContextRegistry;
//!
//! let registry = ContextRegistry::new("system");
//! let plugin = ArchiveLocation::from_file_path("/opt/plugins/audit.jar").unwrap();
//!
//! registry.register(plugin.clone(), "plugin");
//! assert_eq!(registry.resolve(&plugin), "plugin");
//!
//! registry.unregister(&plugin);
//! assert_eq!(registry.resolve(&plugin), "system");
//! ```

use std::fmt;

use dashmap::DashMap;
use tracing::debug;

use crate::location::ArchiveLocation;

/// Concurrent map from archive location to loading context.
pub struct ContextRegistry<C> {
    contexts: DashMap<ArchiveLocation, C>,
    default_context: C,
}

impl<C: Clone> ContextRegistry<C> {
    /// Create an empty registry resolving to `default_context`.
    pub fn new(default_context: C) -> Self {
        Self {
            contexts: DashMap::new(),
            default_context,
        }
    }

    /// Associate `context` with `location`, replacing any previous context.
    ///
    /// Returns the replaced context, if any.
    pub fn register(&self, location: ArchiveLocation, context: C) -> Option<C> {
        debug!(location = %location, "Registering loading context");
        self.contexts.insert(location, context)
    }

    /// Remove the context registered for `location`.
    ///
    /// Removing an unregistered location is a no-op.
    pub fn unregister(&self, location: &ArchiveLocation) -> Option<C> {
        let removed = self.contexts.remove(location).map(|(_, context)| context);
        if removed.is_some() {
            debug!(location = %location, "Unregistered loading context");
        }
        removed
    }

    /// Context to load units from `location` through.
    pub fn resolve(&self, location: &ArchiveLocation) -> C {
        self.get(location)
            .unwrap_or_else(|| self.default_context.clone())
    }

    /// Context registered for `location`, without falling back.
    pub fn get(&self, location: &ArchiveLocation) -> Option<C> {
        self.contexts.get(location).map(|entry| entry.value().clone())
    }

    /// Whether a context is registered for `location`.
    pub fn contains(&self, location: &ArchiveLocation) -> bool {
        self.contexts.contains_key(location)
    }

    /// The fallback context.
    pub fn default_context(&self) -> &C {
        &self.default_context
    }

    /// Snapshot of all registered locations, in unspecified order.
    pub fn locations(&self) -> Vec<ArchiveLocation> {
        self.contexts.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl<C: Clone + Default> Default for ContextRegistry<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C> fmt::Debug for ContextRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextRegistry")
            .field("registered", &self.contexts.len())
            .finish_non_exhaustive()
    }
}
