//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI parser for `apilinks`.
///
/// Every flag falls back to an `APILINKS_*` environment variable, which may
/// also come from a `.env` file.
#[derive(Debug, Parser)]
#[command(
    name = "apilinks",
    version,
    about = "Emit Markdown reference links from a Python package's API to its hosted source"
)]
pub struct Cli {
    /// Dotted name of the module whose members are linked.
    #[arg(long, env = "APILINKS_ROOT", value_name = "MODULE")]
    pub root: String,

    /// Package namespace members must belong to [default: first segment of --root].
    #[arg(long, env = "APILINKS_NAMESPACE", value_name = "NAME")]
    pub namespace: Option<String>,

    /// Directory containing the top-level package.
    #[arg(long, env = "APILINKS_SOURCE_DIR", value_name = "DIR", default_value = ".")]
    pub source_dir: PathBuf,

    /// Directory link paths are relative to [default: <source-dir>/<top package>].
    #[arg(long, env = "APILINKS_LINK_ROOT", value_name = "DIR")]
    pub link_root: Option<PathBuf>,

    /// Hosted repository URL.
    #[arg(long, env = "APILINKS_REPOSITORY", value_name = "URL")]
    pub repository: Option<String>,

    /// Commit every link is pinned to.
    #[arg(long, env = "APILINKS_COMMIT", value_name = "SHA")]
    pub commit: Option<String>,

    /// Module defining `__repository__` and `__commit__` [default: top package].
    #[arg(long, env = "APILINKS_METADATA_MODULE", value_name = "MODULE")]
    pub metadata_module: Option<String>,
}
