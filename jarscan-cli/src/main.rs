//! jarscan CLI - Command-line interface
//!
//! Lists resources and code units found in jar archives, either named on the
//! command line or taken from a classpath variable.
//!
//! ```bash
//! # Every .properties file under com.acme in the classpath archives
//! CLASSPATH=lib/a.jar:lib/b.jar jarscan resources --package com.acme --suffix .properties
//!
//! # Classes in one archive, with debug logging
//! RUST_LOG=debug jarscan classes build/app.jar
//! ```

mod commands;
mod error;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::common::{FilterArgs, SourceArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "jarscan", version, about = "Scan jar archives for resources and classes")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the archive locations a scan would cover
    Locations {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List accepted resource entries
    Resources {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// List accepted class names (inner classes excluded)
    Classes {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        source: SourceArgs,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Locations { source } => commands::locations::run(&source),
        Commands::Resources { filter, source } => commands::scan::run_resources(&filter, &source),
        Commands::Classes { filter, source } => commands::scan::run_classes(&filter, &source),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
