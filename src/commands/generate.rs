//! Link generation: resolve settings, import the root, walk and write.

use std::io::Write;

use crate::cli::Cli;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::links::{collect_links, write_links};
use crate::python::PythonIntrospector;

/// Writes every link reachable from the configured root module to `out`.
///
/// Failures inside the walk only drop the affected links; they never make
/// this function fail.
///
/// # Errors
///
/// Returns an error if the settings are invalid, the repository coordinate
/// cannot be determined, the root module cannot be imported, or writing fails.
pub fn run<W: Write>(cli: &Cli, ctx: &ServiceContext, out: &mut W) -> Result<(), String> {
    let settings = Settings::from_cli(cli)?;
    let python = PythonIntrospector::new(ctx.fs.as_ref(), &settings.source_dir);

    let coordinate = settings.coordinate(&python, ctx.git.as_ref())?;
    let root = python
        .import(&settings.root)
        .map_err(|e| format!("cannot import root module `{}`: {e}", settings.root))?;

    let links = collect_links(&python, &root, &coordinate, &settings.link_settings());
    tracing::debug!(root = %settings.root, count = links.len(), "collected links");

    write_links(&links, out).map_err(|e| format!("failed to write links: {e}"))
}
