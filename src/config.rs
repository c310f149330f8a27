//! Run settings resolved from the command line and package metadata.

use std::path::{Component, Path, PathBuf};

use crate::cli::Cli;
use crate::links::LinkSettings;
use crate::ports::GitRepo;
use crate::python::{package_dir, PythonIntrospector};
use crate::repo::{CoordinateParts, RepoCoordinate};

/// Constant holding the repository URL in the metadata module.
pub const REPOSITORY_CONSTANT: &str = "__repository__";
/// Constant holding the commit in the metadata module.
pub const COMMIT_CONSTANT: &str = "__commit__";

/// Fully defaulted settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Dotted name of the root module.
    pub root: String,
    /// Namespace members must belong to.
    pub namespace: String,
    /// Directory containing the top-level package.
    pub source_dir: PathBuf,
    /// Directory link paths are relative to.
    pub link_root: PathBuf,
    /// Module whose constants supply the coordinate.
    pub metadata_module: String,
    /// Coordinate fields given on the command line or environment.
    pub explicit: CoordinateParts,
}

impl Settings {
    /// Applies defaults to the parsed command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the root module name is not a dotted identifier path,
    /// or if a relative directory is given and the working directory is unknown.
    pub fn from_cli(cli: &Cli) -> Result<Self, String> {
        let root = cli.root.trim().to_string();
        if root.is_empty() || root.split('.').any(|segment| segment.trim().is_empty()) {
            return Err(format!("invalid root module name `{}`", cli.root));
        }
        let top = root.split('.').next().unwrap_or(&root).to_string();

        let source_dir = absolute_dir(&cli.source_dir)?;
        let link_root = match &cli.link_root {
            Some(dir) => absolute_dir(dir)?,
            None => package_dir(&source_dir, &top),
        };

        Ok(Self {
            namespace: non_empty(cli.namespace.as_deref()).unwrap_or_else(|| top.clone()),
            link_root,
            metadata_module: non_empty(cli.metadata_module.as_deref()).unwrap_or(top),
            source_dir,
            explicit: CoordinateParts {
                repository: non_empty(cli.repository.as_deref()),
                commit: non_empty(cli.commit.as_deref()),
            },
            root,
        })
    }

    /// Namespace and link root for the walk.
    #[must_use]
    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings { namespace: self.namespace.clone(), link_root: self.link_root.clone() }
    }

    /// Resolves the repository coordinate: explicit settings first, then the
    /// metadata module's constants, then git.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository URL or commit stays unknown.
    pub fn coordinate(&self, python: &PythonIntrospector<'_>, git: &dyn GitRepo) -> Result<RepoCoordinate, String> {
        let mut parts = self.explicit.clone();
        if !parts.is_complete() {
            parts = parts.or(self.metadata_parts(python));
        }
        if !parts.is_complete() {
            parts = parts.or_from_git(git);
        }
        parts.resolve()
    }

    fn metadata_parts(&self, python: &PythonIntrospector<'_>) -> CoordinateParts {
        let constant = |name: &str| match python.string_constant(&self.metadata_module, name) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                tracing::debug!(module = %self.metadata_module, constant = name, error = %e, "no metadata constant");
                None
            }
        };
        CoordinateParts { repository: constant(REPOSITORY_CONSTANT), commit: constant(COMMIT_CONSTANT) }
    }
}

/// Anchors `dir` at the working directory and folds `.` and `..` lexically.
///
/// Source locations are built under the source dir and stripped of the link
/// root, so both must be spelled the same way. Replayed runs name directories
/// that need not exist, which rules out `canonicalize`.
fn absolute_dir(dir: &Path) -> Result<PathBuf, String> {
    let joined = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| format!("cannot resolve {}: {e}", dir.display()))?;
        cwd.join(dir)
    };
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}
