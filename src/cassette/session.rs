//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::recorder::CassetteRecorder;
use crate::adapters::live::git::LiveGitRepo;
use crate::ports::GitRepo;

/// Per-port `CassetteRecorder` handles for one recording session.
///
/// Each port gets its own recorder writing to a separate cassette file.
/// All cassettes are stored in a timestamped directory.
pub struct RecordingSession {
    /// Recorder for filesystem interactions.
    pub fs: CassetteRecorder,
    /// Recorder for git interactions.
    pub git: CassetteRecorder,
    /// Output directory containing all cassette files.
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session in `<base>/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cassette directory already exists
    /// - The directory cannot be created
    pub fn new_in(base: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = base.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let commit = LiveGitRepo.current_commit().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read git commit for cassette, using 'unknown'");
            "unknown".to_string()
        });

        let make_recorder = |port: &str| {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            CassetteRecorder::new(path, port, format!("{timestamp}-{port}"), commit.as_str())
        };

        Ok(Self { fs: make_recorder("fs"), git: make_recorder("git"), output_dir })
    }

    /// Directory the cassette files are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes each port's cassette and returns the session directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any cassette file cannot be written, or if a
    /// recording adapter still holds a handle to its recorder.
    pub fn finish(self) -> Result<PathBuf, String> {
        self.fs.finish()?;
        self.git.finish()?;
        Ok(self.output_dir)
    }
}
