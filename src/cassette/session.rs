//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::config::{FS_CASSETTE, GIT_CASSETTE};
use super::recorder::CassetteRecorder;
use crate::ports::GitRepo;

/// Manages per-port `CassetteRecorder` instances for a recording session.
///
/// Each port gets its own recorder writing to a separate cassette file.
/// All cassettes are stored in a timestamped directory, which can later be
/// handed to [`super::config::CassetteConfig::from_dir`] for replay.
pub struct RecordingSession {
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for git interactions.
    pub git: Arc<Mutex<CassetteRecorder>>,
    /// Output directory containing all cassette files.
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session in `<base>/<timestamp>/`.
    ///
    /// `git` is only asked for the current commit, which is stamped into
    /// every cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cassette directory already exists
    /// - The directory cannot be created
    pub fn new(base: &Path, git: &dyn GitRepo) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = base.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let commit = commit_or_unknown(git);

        let make_recorder = |file: &str, port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let name = format!("{timestamp}-{port}");
            Arc::new(Mutex::new(CassetteRecorder::new(output_dir.join(file), name, &commit)))
        };

        Ok(Self {
            fs: make_recorder(FS_CASSETTE, "fs"),
            git: make_recorder(GIT_CASSETTE, "git"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// Every adapter holding a recorder must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if any cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.fs, "fs")?;
        finish_one(self.git, "git")?;

        Ok(self.output_dir)
    }
}

/// Get the current commit hash, or "unknown" with a warning if unavailable.
fn commit_or_unknown(git: &dyn GitRepo) -> String {
    match git.current_commit() {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(error = %e, "could not get git commit hash, using 'unknown'");
            "unknown".to_string()
        }
    }
}
