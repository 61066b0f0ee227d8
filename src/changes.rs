//! Where the changed-file list comes from.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::ports::{FileSystem, GitRepo, RevisionRange};

/// Source of the changed-file list for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    /// `git diff --name-only`, between two revisions or for the working tree.
    Git(Option<RevisionRange>),
    /// A newline-separated list of paths read from a file.
    File(PathBuf),
}

impl ChangeSource {
    /// Builds a git source from the optional before/after revisions.
    ///
    /// Both must be present to diff a range; with only one of them the
    /// working tree is diffed instead, which is logged as a warning.
    #[must_use]
    pub fn from_revisions(before: Option<&str>, after: Option<&str>) -> Self {
        fn non_empty(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }

        match (non_empty(before), non_empty(after)) {
            (Some(before), Some(after)) => Self::Git(Some(RevisionRange {
                before: before.to_string(),
                after: after.to_string(),
            })),
            (None, None) => Self::Git(None),
            (before, after) => {
                tracing::warn!(
                    ?before,
                    ?after,
                    "only one revision given, diffing the working tree instead"
                );
                Self::Git(None)
            }
        }
    }

    /// Produces the changed files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Diff`] when git fails and [`Error::Read`] when the
    /// list file cannot be read.
    pub fn changed_files(&self, git: &dyn GitRepo, fs: &dyn FileSystem) -> Result<Vec<String>> {
        let raw = match self {
            Self::Git(range) => {
                tracing::debug!(?range, "listing changed files with git");
                git.diff_names(range.as_ref()).map_err(|e| Error::Diff(e.to_string()))?
            }
            Self::File(path) => fs
                .read_to_string(path)
                .map_err(|e| Error::Read { path: path.clone(), reason: e.to_string() })?,
        };
        let files = parse_file_list(&raw);
        tracing::debug!(count = files.len(), ?files, "changed files");
        Ok(files)
    }
}

/// Splits newline-separated paths, dropping blank lines and a leading `./`.
///
/// Duplicates are kept; the matcher is insensitive to them.
#[must_use]
pub fn parse_file_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .map(|line| line.strip_prefix("./").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeGit, MemFs};

    #[test]
    fn parse_drops_blank_lines_and_dot_prefix() {
        let files = parse_file_list("nginx/Dockerfile\n\n./redis/conf\r\n  \nnginx/Dockerfile\n");
        assert_eq!(files, vec!["nginx/Dockerfile", "redis/conf", "nginx/Dockerfile"]);
    }

    #[test]
    fn parse_empty_output_yields_nothing() {
        assert!(parse_file_list("").is_empty());
        assert!(parse_file_list("\n").is_empty());
    }

    #[test]
    fn range_needs_both_revisions() {
        assert_eq!(
            ChangeSource::from_revisions(Some("a1"), Some("b2")),
            ChangeSource::Git(Some(RevisionRange { before: "a1".into(), after: "b2".into() }))
        );
        assert_eq!(ChangeSource::from_revisions(Some("a1"), None), ChangeSource::Git(None));
        assert_eq!(ChangeSource::from_revisions(Some(""), Some("b2")), ChangeSource::Git(None));
        assert_eq!(ChangeSource::from_revisions(None, None), ChangeSource::Git(None));
        assert_eq!(
            ChangeSource::from_revisions(Some(" a1 "), Some("b2\n")),
            ChangeSource::Git(Some(RevisionRange { before: "a1".into(), after: "b2".into() }))
        );
    }

    #[test]
    fn git_source_uses_diff_output() {
        let git = FakeGit::with_diff("api/main.go\nREADME.md\n");
        let fs = MemFs::new();
        let source = ChangeSource::from_revisions(Some("a1"), Some("b2"));

        let files = source.changed_files(&git, &fs).unwrap();
        assert_eq!(files, vec!["api/main.go", "README.md"]);
        assert_eq!(
            git.last_range(),
            Some(Some(RevisionRange { before: "a1".into(), after: "b2".into() }))
        );
    }

    #[test]
    fn git_failure_is_a_diff_error() {
        let git = FakeGit::failing("fatal: bad revision 'a1'");
        let fs = MemFs::new();

        let err = ChangeSource::Git(None).changed_files(&git, &fs).unwrap_err();
        assert!(matches!(err, Error::Diff(ref msg) if msg.contains("bad revision")));
    }

    #[test]
    fn file_source_reads_list() {
        let git = FakeGit::failing("git must not be called");
        let fs = MemFs::new().with_file("changes.txt", "web/index.html\n");

        let files =
            ChangeSource::File(PathBuf::from("changes.txt")).changed_files(&git, &fs).unwrap();
        assert_eq!(files, vec!["web/index.html"]);
    }

    #[test]
    fn missing_list_file_is_a_read_error() {
        let git = FakeGit::failing("unused");
        let fs = MemFs::new();

        let err = ChangeSource::File(PathBuf::from("nope.txt")).changed_files(&git, &fs).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
