//! CLI error type.

use std::fmt;

use jarscan::ScanError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Scanning or enumeration failed.
    Scan(ScanError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Scan(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Scan(e) => Some(e),
        }
    }
}

impl From<ScanError> for CliError {
    fn from(e: ScanError) -> Self {
        CliError::Scan(e)
    }
}
