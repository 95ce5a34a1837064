//! `locations` command: show what a scan would cover.

use super::common::{cli_registry, SourceArgs};
use crate::error::CliError;

/// Print each resolved location, one per line.
pub fn run(source: &SourceArgs) -> Result<(), CliError> {
    let registry = cli_registry();
    for location in source.resolve(registry.as_ref())? {
        println!("{}", location);
    }
    Ok(())
}
