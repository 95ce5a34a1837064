//! CLI command implementations.

pub mod common;
pub mod locations;
pub mod scan;
