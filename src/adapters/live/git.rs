//! Live git adapter using `git` CLI commands.

use std::process::Command;

use crate::ports::git::GitRepo;

/// Live git adapter that shells out to the `git` CLI in the working directory.
pub struct LiveGitRepo;

impl LiveGitRepo {
    fn run(args: &[&str]) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new("git").args(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitRepo for LiveGitRepo {
    fn current_commit(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Self::run(&["rev-parse", "HEAD"])
    }

    fn remote_url(&self, remote: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Self::run(&["remote", "get-url", remote])
    }
}
