//! Recording adapters that capture interactions to cassettes.
//!
//! Each adapter delegates to an inner port and hands what it saw to the
//! port's `CassetteRecorder`, in the shape the replaying adapters read back.

pub mod filesystem;
pub mod git;

pub use filesystem::RecordingFileSystem;
pub use git::RecordingGitRepo;
