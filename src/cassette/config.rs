//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// File name of the filesystem port cassette inside a session directory.
pub const FS_CASSETTE: &str = "fs.cassette.yaml";
/// File name of the git port cassette inside a session directory.
pub const GIT_CASSETTE: &str = "git.cassette.yaml";

/// Per-port cassette file paths. Ports without a cassette path will panic
/// if called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the filesystem port cassette file.
    pub fs: Option<PathBuf>,
    /// Path to the git port cassette file.
    pub git: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the filesystem port.
    pub fs: Option<CassetteReplayer>,
    /// Replayer for the git port.
    pub git: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Picks up the per-port cassettes a recording session wrote into `dir`.
    ///
    /// A missing file leaves that port unconfigured.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` holds neither cassette.
    pub fn from_dir(dir: &Path) -> Result<Self, String> {
        let pick = |name: &str| Some(dir.join(name)).filter(|p| p.is_file());
        let config = Self { fs: pick(FS_CASSETTE), git: pick(GIT_CASSETTE) };
        if config.fs.is_none() && config.git.is_none() {
            return Err(format!(
                "No cassettes in {}: expected {FS_CASSETTE} or {GIT_CASSETTE}",
                dir.display()
            ));
        }
        Ok(config)
    }

    /// Load a single cassette file and create a replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            fs: self.fs.as_deref().map(Self::load_cassette).transpose()?,
            git: self.git.as_deref().map(Self::load_cassette).transpose()?,
        })
    }
}
