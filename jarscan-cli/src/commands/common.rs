//! Common types and utilities shared across CLI commands.

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use jarscan::classpath::{location_for_path, Classpath};
use jarscan::config::DEFAULT_CLASSPATH_VAR;
use jarscan::filter::{CodeFilter, NameSuffix, PackagePrefix, ResourceFilter};
use jarscan::loader::{CodeLoader, MaterializeError};
use jarscan::registry::ContextRegistry;
use url::Url;

use crate::error::CliError;

/// Where the archives to scan come from.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Archive locations (URLs or filesystem paths); defaults to the classpath
    pub locations: Vec<String>,

    /// Restrict classpath entries to these library file names (e.g., app.jar)
    #[arg(long = "lib", value_name = "NAME")]
    pub libs: Vec<String>,

    /// Environment variable holding the classpath
    #[arg(
        long,
        env = "JARSCAN_CLASSPATH_VAR",
        default_value = DEFAULT_CLASSPATH_VAR,
        value_name = "VAR"
    )]
    pub classpath_var: String,
}

impl SourceArgs {
    /// Resolve the locations to scan.
    ///
    /// Explicit locations take precedence; otherwise the classpath variable is
    /// enumerated together with any registered archives.
    pub fn resolve<C: Clone>(&self, registry: &ContextRegistry<C>) -> Result<Vec<Url>, CliError> {
        if self.locations.is_empty() {
            let libs: Vec<&str> = self.libs.iter().map(String::as_str).collect();
            let classpath = Classpath::from_env(&self.classpath_var);
            return Ok(classpath.locations(&libs, registry)?);
        }

        self.locations.iter().map(|raw| parse_location(raw)).collect()
    }
}

/// Parse a command-line location as a URL, falling back to a filesystem path.
///
/// Single-letter schemes are treated as Windows drive letters.
pub fn parse_location(raw: &str) -> Result<Url, CliError> {
    match Url::parse(raw) {
        Ok(url) if url.scheme().len() > 1 => Ok(url),
        _ => Ok(location_for_path(Path::new(raw))?),
    }
}

/// Package and name restrictions shared by the scan commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only accept entries in this package or below it (e.g., com.acme)
    #[arg(long)]
    pub package: Option<String>,

    /// Only accept entries whose name ends with this suffix
    #[arg(long)]
    pub suffix: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> EntryFilter {
        EntryFilter {
            package: self.package.clone().map(PackagePrefix::new),
            suffix: self.suffix.clone().map(NameSuffix::new),
        }
    }
}

/// Conjunction of the optional package and suffix restrictions.
///
/// With neither set, every entry is accepted.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    package: Option<PackagePrefix>,
    suffix: Option<NameSuffix>,
}

impl ResourceFilter for EntryFilter {
    fn accept(&self, package: &str, name: &str) -> bool {
        self.package
            .as_ref()
            .map_or(true, |p| ResourceFilter::accept(p, package, name))
            && self
                .suffix
                .as_ref()
                .map_or(true, |s| ResourceFilter::accept(s, package, name))
    }
}

impl CodeFilter for EntryFilter {
    fn accept(&self, package: &str, qualified_name: &str) -> bool {
        self.package
            .as_ref()
            .map_or(true, |p| CodeFilter::accept(p, package, qualified_name))
            && self
                .suffix
                .as_ref()
                .map_or(true, |s| CodeFilter::accept(s, package, qualified_name))
    }
}

/// Loader that "materializes" a code unit as its qualified name.
///
/// The CLI has no runtime to load code into, so listing names is the most it
/// can do with an accepted unit.
#[derive(Debug, Default)]
pub struct NameLoader;

impl CodeLoader for NameLoader {
    type Context = ();
    type Unit = String;

    fn materialize(&self, qualified_name: &str, _context: &()) -> Result<String, MaterializeError> {
        Ok(qualified_name.to_string())
    }
}

/// Registry used by the CLI; nothing registers extra archives from the command line.
pub fn cli_registry() -> Arc<ContextRegistry<()>> {
    Arc::new(ContextRegistry::new(()))
}
