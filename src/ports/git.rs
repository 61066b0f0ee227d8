//! Git repository port for version-control queries.

use serde::{Deserialize, Serialize};

use super::PortError;

/// A `before..after` pair of revisions to diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    /// The revision before the change (e.g. the push's `before` SHA).
    pub before: String,
    /// The revision after the change.
    pub after: String,
}

/// Provides read access to a git repository.
///
/// Abstracting git access allows deterministic replay and testing
/// without requiring a real repository.
pub trait GitRepo: Send + Sync {
    /// Returns the hash of the current HEAD commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository has no commits or is invalid.
    fn current_commit(&self) -> Result<String, PortError>;

    /// Returns the raw `git diff --name-only` output, either between the two
    /// revisions of `range` or, when `range` is `None`, for the working tree.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be spawned or exits unsuccessfully.
    fn diff_names(&self, range: Option<&RevisionRange>) -> Result<String, PortError>;
}
