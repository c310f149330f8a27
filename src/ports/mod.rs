//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the link generator and an
//! external system (the Python source tree on disk, the git checkout).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod git;

pub use filesystem::FileSystem;
pub use git::GitRepo;
