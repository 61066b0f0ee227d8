//! Replaying adapter for the `GitRepo` port.

use std::sync::Mutex;

use super::{extract_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::git::{GitRepo, RevisionRange};
use crate::ports::PortError;

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitRepo {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl GitRepo for ReplayingGitRepo {
    fn current_commit(&self) -> Result<String, PortError> {
        let output = next_output(&self.replayer, "git", "current_commit");
        extract_result(&output, "git::current_commit")
    }

    fn diff_names(&self, _range: Option<&RevisionRange>) -> Result<String, PortError> {
        let output = next_output(&self.replayer, "git", "diff_names");
        extract_result(&output, "git::diff_names")
    }
}
