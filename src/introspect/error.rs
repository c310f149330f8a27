//! Errors raised while introspecting a package.

use std::path::PathBuf;

use thiserror::Error;

/// A branch introspection failure.
///
/// Every variant means the same thing to the link generator: the object
/// being processed, and everything beneath it, contributes no links.
#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("Module `{module}` not found under `{search_root}`")]
    ModuleNotFound { module: String, search_root: PathBuf },

    #[error("Failed to read `{path}`: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse `{path}`")]
    Parse { path: PathBuf },

    #[error("Relative import `{import}` escapes the top-level package of `{module}`")]
    RelativeImport { module: String, import: String },

    #[error("Circular import of `{module}`")]
    CircularImport { module: String },

    #[error("`{owner}` has no attribute `{name}`")]
    NoAttribute { owner: String, name: String },

    #[error("`{name}` cannot be resolved in `{module}`")]
    Unresolved { module: String, name: String },

    #[error("Object has no owning module")]
    NoModule,

    #[error("Object has no retrievable source")]
    NoSource,

    #[error("`{path}` is not under link root `{root}`")]
    OutsideLinkRoot { path: PathBuf, root: PathBuf },
}
