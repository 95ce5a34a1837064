//! Error types for archive scanning.
//!
//! Every failure is fatal for the scan call that hit it. The only conditions
//! that are not errors are policy skips (directory-like locations and inner
//! code units), which never surface here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::loader::MaterializeError;
use crate::location::{ArchiveLocation, LocationError};

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that abort a scan or enumeration call.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A location could not be normalized into an openable archive.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Opening or streaming an archive failed.
    #[error("I/O error reading archive {location}: {source}")]
    Io {
        location: ArchiveLocation,
        #[source]
        source: io::Error,
    },

    /// A code unit accepted by the filter could not be materialized.
    #[error("failed to materialize {name} from {location}: {source}")]
    Materialize {
        name: String,
        location: ArchiveLocation,
        #[source]
        source: MaterializeError,
    },

    /// A classpath entry does not exist on the filesystem.
    #[error("classpath contains a path that does not exist: {}", path.display())]
    MissingPath { path: PathBuf },

    /// A relative classpath entry could not be resolved because the current
    /// directory is unavailable.
    #[error("cannot resolve relative classpath entry {}: {source}", path.display())]
    CurrentDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A classpath entry could not be expressed as a file URL.
    #[error("classpath entry is not a valid file location: {}", path.display())]
    InvalidPath { path: PathBuf },
}

impl ScanError {
    /// Location of the archive involved, if the error is tied to one.
    pub fn location(&self) -> Option<&ArchiveLocation> {
        match self {
            Self::Io { location, .. } | Self::Materialize { location, .. } => Some(location),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> ArchiveLocation {
        ArchiveLocation::from_file_path("/opt/lib/app.jar").unwrap()
    }

    #[test]
    fn test_io_error_display_names_location() {
        let err = ScanError::Io {
            location: location(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("file:///opt/lib/app.jar"));
        assert!(msg.contains("gone"));
        assert_eq!(err.location(), Some(&location()));
    }

    #[test]
    fn test_materialize_error_keeps_cause() {
        let err = ScanError::Materialize {
            name: "com.acme.Foo".to_string(),
            location: location(),
            source: MaterializeError::NotFound,
        };
        assert!(err.to_string().contains("com.acme.Foo"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "code unit not found");
    }

    #[test]
    fn test_current_dir_error_keeps_source() {
        let err = ScanError::CurrentDir {
            path: PathBuf::from("lib/app.jar"),
            source: io::Error::new(io::ErrorKind::NotFound, "cwd removed"),
        };
        assert!(err.to_string().contains("lib/app.jar"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "cwd removed");
        assert!(err.location().is_none());
    }

    #[test]
    fn test_missing_path_has_no_location() {
        let err = ScanError::MissingPath {
            path: PathBuf::from("/nope/lib.jar"),
        };
        assert!(err.to_string().contains("/nope/lib.jar"));
        assert!(err.location().is_none());
    }
}
