//! Live git adapter using `git` CLI commands.

use std::path::PathBuf;
use std::process::Command;

use crate::ports::git::{GitRepo, RevisionRange};
use crate::ports::PortError;

/// Live git adapter that shells out to the `git` CLI inside `root`.
pub struct LiveGitRepo {
    root: PathBuf,
}

impl LiveGitRepo {
    /// Creates an adapter running git commands in the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn git(&self, args: &[&str]) -> Result<String, PortError> {
        tracing::debug!(?args, root = %self.root.display(), "running git");
        let output = Command::new("git").args(args).current_dir(&self.root).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitRepo for LiveGitRepo {
    fn current_commit(&self) -> Result<String, PortError> {
        Ok(self.git(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    /// Paths come back unquoted and relative to `root`; changes outside
    /// `root` are left out.
    fn diff_names(&self, range: Option<&RevisionRange>) -> Result<String, PortError> {
        let mut args = vec!["-c", "core.quotePath=false", "diff", "--name-only", "--relative"];
        if let Some(range) = range {
            args.extend([range.before.as_str(), range.after.as_str()]);
        }
        self.git(&args)
    }
}
