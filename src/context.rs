//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::{LiveFileSystem, LiveGitRepo};
use crate::adapters::recording::{RecordingFileSystem, RecordingGitRepo};
use crate::adapters::replaying::{ReplayingFileSystem, ReplayingGitRepo};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::error::{Error, Result};
use crate::ports::{FileSystem, GitRepo, PortError, RevisionRange};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Filesystem for metadata reads and the result write.
    pub fs: Box<dyn FileSystem>,
    /// Git repository the changed files are listed from.
    pub git: Box<dyn GitRepo>,
}

impl ServiceContext {
    /// Creates a live context running git inside `root`.
    #[must_use]
    pub fn live(root: &Path) -> Self {
        Self { fs: Box::new(LiveFileSystem), git: Box::new(LiveGitRepo::new(root)) }
    }

    /// Creates a live context whose port calls are captured by `session`.
    ///
    /// The context must be dropped before [`RecordingSession::finish`].
    #[must_use]
    pub fn recording(root: &Path, session: &RecordingSession) -> Self {
        Self {
            fs: Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                std::sync::Arc::clone(&session.fs),
            )),
            git: Box::new(RecordingGitRepo::new(
                Box::new(LiveGitRepo::new(root)),
                std::sync::Arc::clone(&session.git),
            )),
        }
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette use an adapter that panics with a
    /// clear message when called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if any configured cassette file cannot be
    /// read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self> {
        let replayers = config.load_all().map_err(Error::Cassette)?;

        Ok(Self {
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
            git: match replayers.git {
                Some(r) => Box::new(ReplayingGitRepo::new(r)),
                None => Box::new(PanickingGitRepo),
            },
        })
    }
}

// --- Panicking adapters for unspecified ports ---

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(&self, _path: &Path) -> Result<String, PortError> {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
    fn write(&self, _path: &Path, _contents: &str) -> Result<(), PortError> {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
    fn exists(&self, _path: &Path) -> bool {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
    fn is_dir(&self, _path: &Path) -> bool {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
}

struct PanickingGitRepo;
impl GitRepo for PanickingGitRepo {
    fn current_commit(&self) -> Result<String, PortError> {
        panic!("GitRepo port not configured in CassetteConfig: no cassette loaded for git");
    }
    fn diff_names(&self, _range: Option<&RevisionRange>) -> Result<String, PortError> {
        panic!("GitRepo port not configured in CassetteConfig: no cassette loaded for git");
    }
}
