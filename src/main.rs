//! Binary entrypoint for the `apilinks` CLI.

use std::process::ExitCode;

use apilinks::RunError;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "APILINKS_LOG";

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Stdout carries only links; diagnostics go to stderr and are off by default.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .init();

    // Recording is handled in commands::dispatch via APILINKS_RECORD=<dir>.
    match apilinks::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        // Help and version exit 0, argument errors exit 2.
        Err(RunError::Usage(err)) => err.exit(),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
