//! `resources` and `classes` commands.

use jarscan::ArchiveScanner;
use tracing::info;

use super::common::{cli_registry, FilterArgs, NameLoader, SourceArgs};
use crate::error::CliError;

/// Print every accepted resource entry, one per line.
pub fn run_resources(filter: &FilterArgs, source: &SourceArgs) -> Result<(), CliError> {
    let registry = cli_registry();
    let locations = source.resolve(registry.as_ref())?;
    let scanner = ArchiveScanner::new(NameLoader, registry);

    let names = scanner.scan_resources(&filter.to_filter(), &locations)?;
    info!(archives = locations.len(), found = names.len(), "Resource scan complete");

    for name in names {
        println!("{}", name);
    }
    Ok(())
}

/// Print the qualified name of every accepted code unit, one per line.
pub fn run_classes(filter: &FilterArgs, source: &SourceArgs) -> Result<(), CliError> {
    let registry = cli_registry();
    let locations = source.resolve(registry.as_ref())?;
    let scanner = ArchiveScanner::new(NameLoader, registry);

    let units = scanner.scan_code_units(&filter.to_filter(), &locations)?;
    info!(archives = locations.len(), found = units.len(), "Code unit scan complete");

    for unit in units {
        println!("{}", unit);
    }
    Ok(())
}
