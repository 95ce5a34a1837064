//! Scanner configuration.

/// Default extension marking a loadable code unit entry.
pub const DEFAULT_CODE_EXTENSION: &str = ".class";

/// Default separator identifying synthetic or inner code units.
pub const DEFAULT_INNER_SEPARATOR: char = '$';

/// Default environment variable holding the classpath.
pub const DEFAULT_CLASSPATH_VAR: &str = "CLASSPATH";

/// Options controlling how archive entries are classified.
///
/// The defaults match the jar layout: `.class` files are code units and those
/// whose simple name contains `$` are inner units that are never materialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Entry name suffix that marks a code unit.
    pub code_extension: String,

    /// Character whose presence in a simple name marks an inner unit.
    pub inner_separator: char,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            code_extension: DEFAULT_CODE_EXTENSION.to_string(),
            inner_separator: DEFAULT_INNER_SEPARATOR,
        }
    }
}

impl ScanOptions {
    /// Create options with the jar defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the code unit extension (including the leading dot).
    pub fn with_code_extension(mut self, extension: impl Into<String>) -> Self {
        self.code_extension = extension.into();
        self
    }

    /// Set the inner unit separator.
    pub fn with_inner_separator(mut self, separator: char) -> Self {
        self.inner_separator = separator;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_jar_layout() {
        let options = ScanOptions::default();
        assert_eq!(options.code_extension, ".class");
        assert_eq!(options.inner_separator, '$');
    }

    #[test]
    fn test_builder_overrides() {
        let options = ScanOptions::new()
            .with_code_extension(".beam")
            .with_inner_separator('#');
        assert_eq!(options.code_extension, ".beam");
        assert_eq!(options.inner_separator, '#');
    }
}
