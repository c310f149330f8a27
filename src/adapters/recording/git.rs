//! Recording adapter for the `GitRepo` port.

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::ports::GitRepo;

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: CassetteRecorder,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: CassetteRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RemoteInput<'a> {
    remote: &'a str,
}

impl GitRepo for RecordingGitRepo {
    fn current_commit(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.current_commit();
        self.recorder.record_result("current_commit", &(), &result);
        result
    }

    fn remote_url(&self, remote: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.remote_url(remote);
        self.recorder.record_result("remote_url", &RemoteInput { remote }, &result);
        result
    }
}
