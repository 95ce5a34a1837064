//! Streaming access to jar-like zip archives.
//!
//! # Overview
//!
//! - [`EntryStream`] reads entries sequentially from local file headers,
//!   including entries whose sizes trail the payload in a data descriptor.
//! - [`classify`] decides whether an entry is a resource, a code unit, or
//!   something the scanner never looks at.
//!
//! ```text
//! com/acme/              -> Directory
//! com/acme/Foo.class     -> CodeUnit(com.acme.Foo)
//! com/acme/Foo$1.class   -> InnerCodeUnit
//! com/acme/data.txt      -> Resource(com.acme / data.txt)
//! ```

mod entry;
mod header;
mod reader;

pub use entry::{classify, CodeUnitName, EntryKind, ResourcePath};
pub use reader::{ArchiveEntry, EntryStream};
