//! Error types for target resolution.

use std::path::PathBuf;

/// Broad classification of an [`Error`], used to pick the exit code and the
/// log wording at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The metadata declares something inconsistent.
    Configuration,
    /// The outside world (git, disk, cassettes) failed.
    Environment,
    /// The command line could not be parsed.
    Usage,
}

/// Errors that abort a resolution run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A changed file lies under more than one unit's directory pattern.
    #[error("changed file '{file}' is owned by more than one unit: {}", .units.join(", "))]
    AmbiguousOwner {
        /// The changed file path.
        file: String,
        /// The conflicting unit names, sorted.
        units: Vec<String>,
    },

    /// Unit names that appear in both `infra_priority` and `products_priority`.
    #[error("units declared in both infra_priority and products_priority: {}", .0.join(", "))]
    OverlappingTiers(Vec<String>),

    /// A metadata file is malformed or misses required fields.
    #[error("invalid metadata in {}: {reason}", .path.display())]
    InvalidMetadata {
        /// The offending file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// A glob pattern could not be compiled.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// The compiler's complaint.
        reason: String,
    },

    /// Listing changed files through git failed.
    #[error("git diff failed: {0}")]
    Diff(String),

    /// A required file could not be read.
    #[error("failed to read {}: {reason}", .path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying error message.
        reason: String,
    },

    /// The result could not be written.
    #[error("failed to write {}: {reason}", .path.display())]
    Write {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying error message.
        reason: String,
    },

    /// Recording or replaying cassettes failed.
    #[error("cassette error: {0}")]
    Cassette(String),

    /// The command line was rejected.
    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// Returns the broad category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AmbiguousOwner { .. }
            | Self::OverlappingTiers(_)
            | Self::InvalidMetadata { .. }
            | Self::InvalidPattern { .. } => ErrorKind::Configuration,
            Self::Diff(_) | Self::Read { .. } | Self::Write { .. } | Self::Cassette(_) => {
                ErrorKind::Environment
            }
            Self::Usage(_) => ErrorKind::Usage,
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_ambiguous_owner_lists_units() {
        let err = Error::AmbiguousOwner {
            file: "base/alpine/Dockerfile".to_string(),
            units: vec!["base".to_string(), "base/alpine".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "changed file 'base/alpine/Dockerfile' is owned by more than one unit: base, base/alpine"
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn display_overlapping_tiers() {
        let err = Error::OverlappingTiers(vec!["nginx".to_string()]);
        assert_eq!(
            err.to_string(),
            "units declared in both infra_priority and products_priority: nginx"
        );
    }

    #[test]
    fn environment_errors_are_classified() {
        let err = Error::Read { path: PathBuf::from("project.json"), reason: "gone".to_string() };
        assert_eq!(err.kind(), ErrorKind::Environment);
        assert_eq!(err.to_string(), "failed to read project.json: gone");
        assert_eq!(Error::Diff("bad revision".into()).kind(), ErrorKind::Environment);
    }

    #[test]
    fn usage_errors_pass_message_through() {
        let err = Error::Usage("unexpected argument '--nope'".to_string());
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(err.to_string(), "unexpected argument '--nope'");
    }
}
