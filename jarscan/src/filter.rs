//! Acceptance predicates applied to archive entries.
//!
//! Two independent capabilities gate what a scan returns:
//!
//! - [`ResourceFilter`] sees the dotted package path and the bare leaf name of
//!   every non-directory entry that is not a code unit.
//! - [`CodeFilter`] sees the dotted package path and the fully-qualified name
//!   of every code unit that is not an inner unit (one whose simple name
//!   contains the inner separator).
//!
//! Any `Fn(&str, &str) -> bool` closure implements both traits. The scanner
//! never supplies a default; pass `|_: &str, _: &str| true` to accept
//! everything.
//!
//! # Example
//!
//! ```
//! use jarscan::filter::{CodeFilter, PackagePrefix, ResourceFilter};
//!
//! let properties = |_package: &str, name: &str| name.ends_with(".properties");
//! assert!(ResourceFilter::accept(&properties, "com.acme", "app.properties"));
//!
//! let acme = PackagePrefix::new("com.acme");
//! assert!(CodeFilter::accept(&acme, "com.acme.web", "com.acme.web.Handler"));
//! assert!(!CodeFilter::accept(&acme, "com.acmex", "com.acmex.Other"));
//! ```

/// Predicate over resource entries.
pub trait ResourceFilter {
    /// Decide whether the resource `name` in `package` is returned.
    fn accept(&self, package: &str, name: &str) -> bool;
}

/// Predicate over code unit entries.
pub trait CodeFilter {
    /// Decide whether the code unit `qualified_name` in `package` is materialized.
    fn accept(&self, package: &str, qualified_name: &str) -> bool;
}

impl<F> ResourceFilter for F
where
    F: Fn(&str, &str) -> bool,
{
    fn accept(&self, package: &str, name: &str) -> bool {
        self(package, name)
    }
}

impl<F> CodeFilter for F
where
    F: Fn(&str, &str) -> bool,
{
    fn accept(&self, package: &str, qualified_name: &str) -> bool {
        self(package, qualified_name)
    }
}

/// Accepts entries whose package equals a prefix or is nested below it.
///
/// An empty prefix accepts every package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePrefix {
    prefix: String,
}

impl PackagePrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn matches(&self, package: &str) -> bool {
        if self.prefix.is_empty() {
            return true;
        }
        match package.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

impl ResourceFilter for PackagePrefix {
    fn accept(&self, package: &str, _name: &str) -> bool {
        self.matches(package)
    }
}

impl CodeFilter for PackagePrefix {
    fn accept(&self, package: &str, _qualified_name: &str) -> bool {
        self.matches(package)
    }
}

/// Accepts entries whose identifier ends with a suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSuffix {
    suffix: String,
}

impl NameSuffix {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl ResourceFilter for NameSuffix {
    fn accept(&self, _package: &str, name: &str) -> bool {
        name.ends_with(self.suffix.as_str())
    }
}

impl CodeFilter for NameSuffix {
    fn accept(&self, _package: &str, qualified_name: &str) -> bool {
        qualified_name.ends_with(self.suffix.as_str())
    }
}
