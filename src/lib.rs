//! Core library for the `targetscope` CLI.
//!
//! Given a monorepo's `project.json` and a set of changed files, decides
//! which infra and product units must be rebuilt, and in which order.

pub mod adapters;
pub mod cassette;
pub mod changes;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod metadata;
pub mod ports;
pub mod report;
pub mod resolver;

#[cfg(test)]
mod testing;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;

pub use error::{Error, ErrorKind, Result};

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` are printed and count as success.
///
/// # Errors
///
/// Returns [`Error::Usage`] when argument parsing fails, or the error of the
/// executed command.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err)
            if matches!(err.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) =>
        {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(Error::Usage(err.to_string())),
    };

    logging::init(cli.debug);
    tracing::debug!(?cli, "parsed arguments");
    commands::dispatch(&cli.command)
}
