//! Archive location normalization.
//!
//! Callers hand the scanner raw URLs. Two encodings need attention before a
//! URL can be opened as a byte stream:
//!
//! - **Nested-archive wrapper**: `jar:file:/opt/lib/app.jar!/` names the
//!   inner view of an archive. The wrapper is stripped to recover the
//!   archive's own location (`file:///opt/lib/app.jar`).
//! - **Expanded directories**: a location ending in `/` is a directory of
//!   loose files, not a packed archive. It is skipped, not reported.
//!
//! # Example
//!
//! ```
//! use jarscan::location::{normalize, Normalized};
//! use url::Url;
//!
//! let raw = Url::parse("jar:file:/opt/lib/app.jar!/").unwrap();
//! match normalize(&raw).unwrap() {
//!     Normalized::Archive(location) => {
//!         assert_eq!(location.as_str(), "file:///opt/lib/app.jar");
//!     }
//!     Normalized::Skip => unreachable!(),
//! }
//!
//! let dir = Url::parse("file:///opt/classes/").unwrap();
//! assert!(matches!(normalize(&dir).unwrap(), Normalized::Skip));
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;
use url::Url;

/// Scheme prefix of the nested-archive wrapper.
pub const NESTED_ARCHIVE_PREFIX: &str = "jar:";

/// Suffix marking the root of a nested-archive view.
pub const NESTED_ARCHIVE_SUFFIX: &str = "!/";

/// Configuration errors raised while normalizing a location.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The location ends with the nested-archive suffix but lacks the wrapper prefix.
    #[error("malformed nested archive location '{location}': missing 'jar:' prefix")]
    MissingWrapperPrefix { location: String },

    /// The unwrapped archive location is not a valid URL.
    #[error("malformed nested archive location '{location}': {source}")]
    InvalidWrapped {
        location: String,
        #[source]
        source: url::ParseError,
    },
}

/// A normalized, directly openable archive location.
///
/// Only produced by [`normalize`] or [`ArchiveLocation::from_file_path`], so
/// it never carries the nested-archive wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveLocation(Url);

impl ArchiveLocation {
    /// Location of a packed archive on the local filesystem.
    ///
    /// Returns `None` for relative paths. The path is not required to exist.
    pub fn from_file_path(path: impl AsRef<Path>) -> Option<Self> {
        Url::from_file_path(path).ok().map(Self)
    }

    /// The underlying URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The location as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the location, returning the underlying URL.
    pub fn into_url(self) -> Url {
        self.0
    }

    /// Open the archive as a raw byte stream.
    ///
    /// Only `file` locations are supported.
    pub fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        match self.0.scheme() {
            "file" => {
                let path = self.0.to_file_path().map_err(|()| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("not a local file location: {}", self.0),
                    )
                })?;
                Ok(Box::new(File::open(path)?))
            }
            scheme => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unsupported archive scheme '{}'", scheme),
            )),
        }
    }
}

impl fmt::Display for ArchiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<ArchiveLocation> for Url {
    fn from(location: ArchiveLocation) -> Self {
        location.0
    }
}

/// Outcome of normalizing a raw location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// A packed archive ready to be streamed.
    Archive(ArchiveLocation),

    /// A directory-like location with nothing to scan.
    Skip,
}

/// Normalize a raw location into an openable archive location.
///
/// # Errors
///
/// Returns [`LocationError`] when a nested-archive wrapper cannot be stripped
/// into a valid URL. Directory-like locations are not errors and yield
/// [`Normalized::Skip`].
///
/// Only the archive-root view (`jar:<url>!/`) is unwrapped. A location naming
/// an entry inside an archive, such as `jar:file:/a.jar!/lib/x.jar`, is
/// returned unchanged as an [`Normalized::Archive`]; its scheme is `jar`, so
/// [`ArchiveLocation::open`] later fails with `Unsupported`.
pub fn normalize(raw: &Url) -> Result<Normalized, LocationError> {
    let text = raw.as_str();

    let url = match text.strip_suffix(NESTED_ARCHIVE_SUFFIX) {
        Some(wrapped) => {
            let inner = wrapped.strip_prefix(NESTED_ARCHIVE_PREFIX).ok_or_else(|| {
                LocationError::MissingWrapperPrefix {
                    location: text.to_string(),
                }
            })?;
            Url::parse(inner).map_err(|source| LocationError::InvalidWrapped {
                location: text.to_string(),
                source,
            })?
        }
        None => raw.clone(),
    };

    if url.as_str().ends_with('/') {
        return Ok(Normalized::Skip);
    }

    Ok(Normalized::Archive(ArchiveLocation(url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn archive(s: &str) -> ArchiveLocation {
        match normalize(&url(s)).unwrap() {
            Normalized::Archive(location) => location,
            Normalized::Skip => panic!("expected archive for {}", s),
        }
    }

    #[test]
    fn test_plain_file_location_is_unchanged() {
        assert_eq!(archive("file:///opt/lib/app.jar").as_str(), "file:///opt/lib/app.jar");
    }

    #[test]
    fn test_nested_wrapper_is_stripped() {
        let location = archive("jar:file:/opt/lib/app.jar!/");
        assert_eq!(location.as_str(), "file:///opt/lib/app.jar");
        assert_eq!(location, archive("file:///opt/lib/app.jar"));
    }

    #[test]
    fn test_directory_location_is_skipped() {
        assert_eq!(normalize(&url("file:///opt/classes/")).unwrap(), Normalized::Skip);
    }

    #[test]
    fn test_wrapped_directory_is_skipped() {
        assert_eq!(
            normalize(&url("jar:file:/opt/classes/!/")).unwrap(),
            Normalized::Skip
        );
    }

    #[test]
    fn test_suffix_without_prefix_is_error() {
        let err = normalize(&url("file:///opt/lib/app.jar!/")).unwrap_err();
        assert!(matches!(err, LocationError::MissingWrapperPrefix { .. }));
    }

    #[test]
    fn test_unparseable_inner_location_is_error() {
        let err = normalize(&url("jar:not a location!/")).unwrap_err();
        assert!(matches!(err, LocationError::InvalidWrapped { .. }));
        assert!(err.to_string().contains("jar:not"));
    }

    #[test]
    fn test_nested_entry_location_passes_through_unopenable() {
        let location = archive("jar:file:/a.jar!/lib/x.jar");
        assert_eq!(location.as_str(), "jar:file:/a.jar!/lib/x.jar");
        let err = location.open().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn test_open_rejects_unsupported_scheme() {
        let location = archive("http://example.com/app.jar");
        let err = location.open().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let location = ArchiveLocation::from_file_path(dir.path().join("absent.jar")).unwrap();
        let err = location.open().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_from_file_path_rejects_relative() {
        assert!(ArchiveLocation::from_file_path("lib/app.jar").is_none());
    }
}
