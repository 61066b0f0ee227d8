//! Filesystem port: metadata reads, unit directory probes, result write.

use std::path::Path;

use super::PortError;

/// Every disk access a resolution run makes goes through this trait, so a
/// run can be recorded and replayed without the repository checked out.
pub trait FileSystem: Send + Sync {
    /// Reads a whole UTF-8 file, such as `project.json` or a unit's
    /// `metadata.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or not UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Creates or truncates `path` and writes `contents`, creating missing
    /// parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the file cannot be created.
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory. Unit directories are probed
    /// with this before a match pattern is built for them.
    fn is_dir(&self, path: &Path) -> bool;
}
