//! Recording adapter for the `GitRepo` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{GitRepo, PortError, RevisionRange};

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl GitRepo for RecordingGitRepo {
    fn current_commit(&self) -> Result<String, PortError> {
        let result = self.inner.current_commit();
        record_result(&self.recorder, "git", "current_commit", &(), &result);
        result
    }

    fn diff_names(&self, range: Option<&RevisionRange>) -> Result<String, PortError> {
        let result = self.inner.diff_names(range);
        record_result(&self.recorder, "git", "diff_names", &range, &result);
        result
    }
}
