//! Scan orchestration.
//!
//! [`ArchiveScanner`] drives the pipeline shared by both scan entry points:
//!
//! ```text
//! locations ──► normalize ──► EntryStream ──► classify ──► filter ──► results
//!                  │ skip dirs                     │ skip dirs,        │
//!                  ▼                               ▼ inner units       ▼
//!            LocationError                                   registry + loader
//!                                                           (code units only)
//! ```
//!
//! Locations are visited in caller order and entries in archive order. The
//! first error of any kind aborts the whole call; results gathered from
//! earlier archives are discarded. Each call re-reads every archive.

use std::sync::Arc;

use tracing::{debug, trace};
use url::Url;

use crate::archive::{classify, EntryKind, EntryStream};
use crate::config::ScanOptions;
use crate::error::{ScanError, ScanResult};
use crate::filter::{CodeFilter, ResourceFilter};
use crate::loader::CodeLoader;
use crate::location::{normalize, ArchiveLocation, Normalized};
use crate::registry::ContextRegistry;

/// Discovers resources and code units across a list of archives.
pub struct ArchiveScanner<L: CodeLoader> {
    loader: L,
    registry: Arc<ContextRegistry<L::Context>>,
    options: ScanOptions,
}

impl<L: CodeLoader> ArchiveScanner<L> {
    /// Create a scanner with the default jar options.
    ///
    /// # Arguments
    ///
    /// * `loader` - Materializes accepted code units
    /// * `registry` - Per-archive loading contexts, shared with bootstrap code
    pub fn new(loader: L, registry: Arc<ContextRegistry<L::Context>>) -> Self {
        Self {
            loader,
            registry,
            options: ScanOptions::default(),
        }
    }

    /// Replace the entry classification options.
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<ContextRegistry<L::Context>> {
        &self.registry
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Collect the names of resource entries accepted by `filter`.
    ///
    /// Returned names are the raw archive-relative paths, e.g.
    /// `com/acme/data.txt`. The same path found in two archives is returned
    /// twice.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed location or unreadable archive.
    pub fn scan_resources<F>(&self, filter: &F, locations: &[Url]) -> ScanResult<Vec<String>>
    where
        F: ResourceFilter + ?Sized,
    {
        let mut names = Vec::new();

        self.scan(locations, |_, entry_name, kind| {
            if let EntryKind::Resource(path) = kind {
                if filter.accept(&path.package, &path.name) {
                    trace!(entry = entry_name, "Accepted resource");
                    names.push(entry_name.to_string());
                }
            }
            Ok(())
        })?;

        Ok(names)
    }

    /// Materialize every code unit accepted by `filter`.
    ///
    /// Inner units never reach the filter. Each accepted unit is loaded through
    /// the context registered for its archive, or the registry default.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed location, unreadable archive, or unit the
    /// loader cannot materialize.
    pub fn scan_code_units<F>(&self, filter: &F, locations: &[Url]) -> ScanResult<Vec<L::Unit>>
    where
        F: CodeFilter + ?Sized,
    {
        let mut units = Vec::new();

        self.scan(locations, |location, _, kind| {
            if let EntryKind::CodeUnit(unit) = kind {
                if filter.accept(&unit.package, &unit.qualified) {
                    units.push(self.materialize(location, unit.qualified)?);
                }
            }
            Ok(())
        })?;

        Ok(units)
    }

    fn materialize(&self, location: &ArchiveLocation, name: String) -> ScanResult<L::Unit> {
        let context = self.registry.resolve(location);
        match self.loader.materialize(&name, &context) {
            Ok(unit) => {
                trace!(unit = %name, location = %location, "Materialized code unit");
                Ok(unit)
            }
            Err(source) => Err(ScanError::Materialize {
                name,
                location: location.clone(),
                source,
            }),
        }
    }

    /// Stream every archive in `locations`, handing each entry to `visit`.
    fn scan<V>(&self, locations: &[Url], mut visit: V) -> ScanResult<()>
    where
        V: FnMut(&ArchiveLocation, &str, EntryKind) -> ScanResult<()>,
    {
        for raw in locations {
            let location = match normalize(raw)? {
                Normalized::Archive(location) => location,
                Normalized::Skip => {
                    debug!(location = %raw, "Skipping directory location");
                    continue;
                }
            };

            let mut stream = EntryStream::open(location.clone())?;
            while let Some(entry) = stream.next_entry()? {
                let kind = classify(entry.name(), entry.is_dir(), &self.options);
                visit(&location, entry.name(), kind)?;
            }

            debug!(
                location = %location,
                entries = stream.entries_read(),
                "Scanned archive"
            );
        }

        Ok(())
    }
}

impl<L> std::fmt::Debug for ArchiveScanner<L>
where
    L: CodeLoader + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveScanner")
            .field("loader", &self.loader)
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish()
    }
}
