//! Command dispatch and handlers.

pub mod generate;

use std::env;
use std::path::PathBuf;

use crate::cassette::session::RecordingSession;
use crate::cli::Cli;
use crate::context::ServiceContext;

/// Environment variable naming the directory port recordings are written to.
pub const RECORD_ENV: &str = "APILINKS_RECORD";

/// Runs the link generator for a parsed command line.
///
/// When `APILINKS_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if setup fails or the links cannot be written.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let (ctx, session) = match env::var_os(RECORD_ENV) {
        Some(path) => {
            let (ctx, session) = ServiceContext::recording_at(PathBuf::from(path))?;
            tracing::info!(dir = %session.output_dir().display(), "recording port interactions");
            (ctx, Some(session))
        }
        None => (ServiceContext::live(), None),
    };

    let stdout = std::io::stdout();
    let result = generate::run(cli, &ctx, &mut stdout.lock());

    // Recorders are shared with the adapters, so the context goes first.
    if let Some(session) = session {
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Finish a recording session and report the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    tracing::info!(dir = %output_dir.display(), "recording saved");
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
