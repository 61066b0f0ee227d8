//! Deriving a match pattern for each declared unit.

use std::path::Path;

use globset::{Glob, GlobBuilder};

use crate::error::{Error, Result};
use crate::metadata::Unit;
use crate::ports::FileSystem;

/// How a unit obtained (or failed to obtain) its match pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSource {
    /// The unit directory exists; the pattern covers everything beneath it.
    Directory,
    /// The unit name is itself a glob and is used verbatim.
    Verbatim,
    /// The directory is missing or not a directory; the unit never matches.
    Missing,
}

/// Returns the glob a unit is matched with, or `None` for a unit whose
/// directory does not exist under `root`.
///
/// Both the verbatim and the missing case are logged as warnings.
pub fn unit_pattern(
    unit: &Unit,
    fs: &dyn FileSystem,
    root: &Path,
) -> (PatternSource, Option<String>) {
    if unit.is_pattern() {
        tracing::warn!(
            unit = %unit.name,
            "unit name is a glob pattern; use a directory name instead"
        );
        return (PatternSource::Verbatim, Some(unit.path.clone()));
    }

    if fs.is_dir(&root.join(&unit.path)) {
        let pattern = format!("{}/**/*", globset::escape(&unit.path));
        (PatternSource::Directory, Some(pattern))
    } else {
        tracing::warn!(
            unit = %unit.name,
            path = %unit.path,
            "unit directory does not exist or is not a directory, skipping"
        );
        (PatternSource::Missing, None)
    }
}

/// Compiles a pattern with path-aware semantics: `*` and `?` stay within one
/// path component while `**` spans any number of directories.
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`] if the pattern does not parse.
pub fn compile(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}
