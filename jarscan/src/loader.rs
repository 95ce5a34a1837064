//! Code unit materialization.
//!
//! The scanner does not know how code is loaded. It resolves a loading context
//! for the archive a unit was found in and hands the unit's fully-qualified
//! name to a [`CodeLoader`], which either produces the unit or explains why it
//! could not.

use thiserror::Error;

/// Why a code unit could not be materialized.
///
/// The variants stay distinguishable for callers that inspect the cause, but
/// the scanner aborts on all of them alike.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// No unit with the requested name is visible through the context.
    #[error("code unit not found")]
    NotFound,

    /// The unit was found but its one-time initialization failed.
    #[error("code unit initialization failed: {reason}")]
    Initialization { reason: String },

    /// The unit was found but a unit it requires is missing.
    #[error("missing dependency {dependency}")]
    MissingDependency { dependency: String },
}

/// Capability to load a named code unit through a loading context.
///
/// Implementations must be shareable across threads; a single loader backs
/// every scan issued through an [`ArchiveScanner`](crate::scanner::ArchiveScanner).
pub trait CodeLoader: Send + Sync {
    /// Resolution scope a unit is loaded in.
    type Context: Clone + Send + Sync;

    /// The materialized unit.
    type Unit;

    /// Load `qualified_name` through `context`.
    fn materialize(
        &self,
        qualified_name: &str,
        context: &Self::Context,
    ) -> Result<Self::Unit, MaterializeError>;
}
