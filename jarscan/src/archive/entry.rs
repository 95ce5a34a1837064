//! Entry name classification.
//!
//! Archive entries are identified by slash-delimited relative paths. A path
//! either names a generic resource (package path plus leaf name) or a code
//! unit (fully-qualified dotted name derived from the path).

use crate::config::ScanOptions;

/// Package path and leaf name of a resource entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    /// Dot-normalized package path; empty at the archive root.
    pub package: String,

    /// Final path segment.
    pub name: String,
}

impl ResourcePath {
    /// Split an entry path at its last slash.
    ///
    /// ```
    /// use jarscan::archive::ResourcePath;
    ///
    /// let path = ResourcePath::parse("com/acme/data.txt");
    /// assert_eq!(path.package, "com.acme");
    /// assert_eq!(path.name, "data.txt");
    ///
    /// let root = ResourcePath::parse("README");
    /// assert_eq!(root.package, "");
    /// assert_eq!(root.name, "README");
    /// ```
    pub fn parse(entry_name: &str) -> Self {
        match entry_name.rsplit_once('/') {
            Some((package, name)) => Self {
                package: package.replace('/', "."),
                name: name.to_string(),
            },
            None => Self {
                package: String::new(),
                name: entry_name.to_string(),
            },
        }
    }
}

/// Fully-qualified name of a code unit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUnitName {
    /// Dot-normalized package; empty for units at the archive root.
    pub package: String,

    /// Dotted name including the package, extension stripped.
    pub qualified: String,
}

impl CodeUnitName {
    /// Derive the qualified name of an entry ending in `extension`.
    ///
    /// Returns `None` when the entry does not carry the extension.
    ///
    /// ```
    /// use jarscan::archive::CodeUnitName;
    ///
    /// let unit = CodeUnitName::parse("com/acme/Foo.class", ".class").unwrap();
    /// assert_eq!(unit.qualified, "com.acme.Foo");
    /// assert_eq!(unit.package, "com.acme");
    /// assert!(CodeUnitName::parse("com/acme/data.txt", ".class").is_none());
    /// ```
    pub fn parse(entry_name: &str, extension: &str) -> Option<Self> {
        let stem = entry_name.strip_suffix(extension)?;
        let qualified = stem.replace('/', ".");
        let package = qualified
            .rsplit_once('.')
            .map(|(package, _)| package.to_string())
            .unwrap_or_default();
        Some(Self { package, qualified })
    }

    /// Simple name without the package.
    pub fn simple_name(&self) -> &str {
        self.qualified
            .rsplit_once('.')
            .map_or(self.qualified.as_str(), |(_, name)| name)
    }
}

/// How an entry participates in a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory marker; never scanned.
    Directory,

    /// Synthetic or inner code unit; rejected before any filter runs.
    InnerCodeUnit,

    /// Candidate for the code filter.
    CodeUnit(CodeUnitName),

    /// Candidate for the resource filter.
    Resource(ResourcePath),
}

/// Classify an entry by its name and directory flag.
///
/// A code unit is an inner unit when its simple name contains the inner
/// separator; the separator may appear in package segments.
pub fn classify(entry_name: &str, is_dir: bool, options: &ScanOptions) -> EntryKind {
    if is_dir {
        return EntryKind::Directory;
    }

    match CodeUnitName::parse(entry_name, &options.code_extension) {
        Some(unit) if unit.simple_name().contains(options.inner_separator) => {
            EntryKind::InnerCodeUnit
        }
        Some(unit) => EntryKind::CodeUnit(unit),
        None => EntryKind::Resource(ResourcePath::parse(entry_name)),
    }
}
