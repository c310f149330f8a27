//! Git repository port for repository-coordinate queries.

/// Provides read access to the git checkout the package lives in.
///
/// Abstracting git access allows deterministic replay and testing
/// without requiring a real repository.
pub trait GitRepo: Send + Sync {
    /// Returns the hash of the current HEAD commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository has no commits or is invalid.
    fn current_commit(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns the configured URL of the named remote (usually `origin`).
    ///
    /// # Errors
    ///
    /// Returns an error if the remote does not exist.
    fn remote_url(&self, remote: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}
