//! Core library entry for the `apilinks` CLI.
//!
//! Walks a Python package's public API and emits one Markdown reference
//! link per function, class, method and generator, pointing at the line
//! that defines it in the hosted repository.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod introspect;
pub mod links;
pub mod ports;
pub mod python;
pub mod repo;

use clap::Parser;

/// Why a run did not complete.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The arguments were rejected, or `--help`/`--version` was asked for.
    /// Clap renders these and picks the exit status.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// Setup or output failed after the arguments were accepted.
    #[error("{0}")]
    Failed(String),
}

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns [`RunError::Usage`] when argument parsing fails and
/// [`RunError::Failed`] when link generation fails.
pub fn run<I, T>(args: I) -> Result<(), RunError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args)?;
    commands::dispatch(&cli).map_err(RunError::Failed)
}

#[cfg(test)]
mod tests {
    use super::{run, RunError};
    use clap::error::ErrorKind;

    #[test]
    fn run_errors_without_root() {
        let result = run(["apilinks", "--root"]);
        assert!(matches!(result, Err(RunError::Usage(_))));
    }

    #[test]
    fn run_errors_on_unknown_flag() {
        let result = run(["apilinks", "--root", "pkg", "--unknown"]);
        assert!(matches!(result, Err(RunError::Usage(e)) if e.kind() == ErrorKind::UnknownArgument));
    }

    #[test]
    fn help_is_reported_as_usage() {
        let result = run(["apilinks", "--help"]);
        assert!(matches!(result, Err(RunError::Usage(e)) if e.kind() == ErrorKind::DisplayHelp));
    }

    #[test]
    fn malformed_root_fails_after_parsing() {
        let result = run(["apilinks", "--root", "pkg..core"]);
        let Err(RunError::Failed(message)) = result else {
            panic!("expected a setup failure, got {result:?}");
        };
        assert!(message.contains("pkg..core"));
    }
}
