//! Classpath enumeration.
//!
//! Turns a classpath-like variable into the ordered list of locations a scan
//! should cover, optionally restricted to specific libraries, followed by
//! every archive registered in a [`ContextRegistry`].
//!
//! Entries are separated by the platform path separator (`:` on Unix, `;` on
//! Windows). Directories become `/`-terminated URLs, which the scanner skips.

use std::env;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::error::{ScanError, ScanResult};
use crate::registry::ContextRegistry;

/// A parsed classpath.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    entries: Vec<PathBuf>,
}

impl Classpath {
    /// Parse a separator-delimited classpath value.
    ///
    /// Entries are trimmed and empty entries are dropped.
    pub fn parse(value: impl AsRef<OsStr>) -> Self {
        let entries = env::split_paths(value.as_ref())
            .map(|path| match path.to_str() {
                Some(s) => PathBuf::from(s.trim()),
                None => path,
            })
            .filter(|path| !path.as_os_str().is_empty())
            .collect();
        Self { entries }
    }

    /// Read the classpath from environment variable `var`.
    ///
    /// An unset variable yields an empty classpath.
    pub fn from_env(var: &str) -> Self {
        env::var_os(var).map(Self::parse).unwrap_or_default()
    }

    /// The parsed entries, in order.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Enumerate scan locations.
    ///
    /// With an empty `libs`, every classpath entry is kept. Otherwise an entry
    /// is kept when its path ends with one of `libs` as whole path segments, so
    /// `app.jar` matches `/opt/lib/app.jar` but not `/opt/lib/myapp.jar`.
    /// Locations registered in `registry` are appended after the classpath
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::MissingPath`] if a kept entry does not exist.
    pub fn locations<C: Clone>(
        &self,
        libs: &[&str],
        registry: &ContextRegistry<C>,
    ) -> ScanResult<Vec<Url>> {
        let mut locations = Vec::new();

        for path in &self.entries {
            if !libs.is_empty() && !libs.iter().any(|lib| path.ends_with(lib)) {
                continue;
            }
            if !path.exists() {
                return Err(ScanError::MissingPath { path: path.clone() });
            }
            locations.push(location_for_path(path)?);
        }

        let from_classpath = locations.len();
        locations.extend(registry.locations().into_iter().map(Url::from));

        debug!(
            classpath = from_classpath,
            registered = locations.len() - from_classpath,
            "Enumerated scan locations"
        );
        Ok(locations)
    }
}

/// File URL for an existing path, `/`-terminated for directories.
///
/// Relative paths are resolved against the current directory.
pub fn location_for_path(path: &Path) -> ScanResult<Url> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        resolve_relative(path, env::current_dir())?
    };

    let url = if absolute.is_dir() {
        Url::from_directory_path(&absolute)
    } else {
        Url::from_file_path(&absolute)
    };

    url.map_err(|()| ScanError::InvalidPath {
        path: path.to_path_buf(),
    })
}

fn resolve_relative(path: &Path, cwd: io::Result<PathBuf>) -> ScanResult<PathBuf> {
    cwd.map(|cwd| cwd.join(path))
        .map_err(|source| ScanError::CurrentDir {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::ArchiveLocation;
    use std::fs;

    fn join(paths: &[&Path]) -> std::ffi::OsString {
        env::join_paths(paths).unwrap()
    }

    #[test]
    fn test_parse_trims_and_drops_empty() {
        let sep = if cfg!(windows) { ";" } else { ":" };
        let raw = format!(" /opt/a.jar {sep}{sep}/opt/b.jar{sep}", sep = sep);
        let classpath = Classpath::parse(raw);
        assert_eq!(
            classpath.entries(),
            &[PathBuf::from("/opt/a.jar"), PathBuf::from("/opt/b.jar")]
        );
    }

    #[test]
    fn test_from_env_unset_is_empty() {
        let classpath = Classpath::from_env("JARSCAN_TEST_SURELY_UNSET_VARIABLE");
        assert!(classpath.entries().is_empty());
    }

    #[test]
    fn test_all_entries_kept_without_libs() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("app.jar");
        fs::write(&jar, b"").unwrap();
        let classes = dir.path().join("classes");
        fs::create_dir(&classes).unwrap();

        let classpath = Classpath::parse(join(&[&jar, &classes]));
        let registry = ContextRegistry::new(());
        let locations = classpath.locations(&[], &registry).unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0], Url::from_file_path(&jar).unwrap());
        assert!(locations[1].as_str().ends_with("/classes/"));
    }

    #[test]
    fn test_lib_filter_matches_whole_segment() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app.jar");
        let myapp = dir.path().join("myapp.jar");
        fs::write(&app, b"").unwrap();
        fs::write(&myapp, b"").unwrap();

        let classpath = Classpath::parse(join(&[&myapp, &app]));
        let registry = ContextRegistry::new(());
        let locations = classpath.locations(&["app.jar"], &registry).unwrap();

        assert_eq!(locations, vec![Url::from_file_path(&app).unwrap()]);
    }

    #[test]
    fn test_missing_kept_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.jar");

        let classpath = Classpath::parse(join(&[&missing]));
        let registry = ContextRegistry::new(());
        let err = classpath.locations(&[], &registry).unwrap_err();
        assert!(matches!(err, ScanError::MissingPath { path } if path == missing));
    }

    #[test]
    fn test_missing_filtered_out_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.jar");

        let classpath = Classpath::parse(join(&[&missing]));
        let registry = ContextRegistry::new(());
        assert!(classpath.locations(&["other.jar"], &registry).unwrap().is_empty());
    }

    #[test]
    fn test_registered_locations_come_last() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("app.jar");
        fs::write(&jar, b"").unwrap();
        let plugin = ArchiveLocation::from_file_path(dir.path().join("plugin.jar")).unwrap();

        let registry = ContextRegistry::new("system");
        registry.register(plugin.clone(), "plugin");

        let classpath = Classpath::parse(join(&[&jar]));
        let locations = classpath.locations(&[], &registry).unwrap();
        assert_eq!(
            locations,
            vec![Url::from_file_path(&jar).unwrap(), plugin.into_url()]
        );
    }

    #[test]
    fn test_location_for_relative_path() {
        let cwd = env::current_dir().unwrap();
        let url = location_for_path(Path::new("Cargo.toml")).unwrap();
        assert_eq!(url, Url::from_file_path(cwd.join("Cargo.toml")).unwrap());
    }

    #[test]
    fn test_unavailable_current_dir_keeps_cause() {
        let cwd = Err(io::Error::new(io::ErrorKind::NotFound, "cwd removed"));
        match resolve_relative(Path::new("lib/app.jar"), cwd).unwrap_err() {
            ScanError::CurrentDir { path, source } => {
                assert_eq!(path, PathBuf::from("lib/app.jar"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_relative_path_joins_current_dir() {
        let cwd = Ok(PathBuf::from("/work"));
        let resolved = resolve_relative(Path::new("lib/app.jar"), cwd).unwrap();
        assert_eq!(resolved, PathBuf::from("/work/lib/app.jar"));
    }
}
