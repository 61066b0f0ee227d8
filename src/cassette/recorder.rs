//! Accumulates port interactions and writes them out as one cassette.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};
use crate::error::{Error, Result};

/// Collects the interactions of one port during a recorded run.
///
/// Sequence numbers are the position in the recording, starting at zero.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Starts an empty recording destined for `path`.
    ///
    /// `commit` is the revision the run was recorded at, or `"unknown"`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        let cassette = Cassette {
            name: name.into(),
            recorded_at: Utc::now(),
            commit: commit.into(),
            interactions: Vec::new(),
        };
        Self { path: path.into(), cassette }
    }

    /// Appends one interaction.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.cassette.interactions.len() as u64;
        self.cassette.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Stamps the cassette with the finishing time and writes it as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if the cassette cannot be serialized or
    /// the file cannot be written.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.cassette.recorded_at = Utc::now();
        let yaml = serde_yaml::to_string(&self.cassette)
            .map_err(|e| Error::Cassette(format!("failed to serialize cassette: {e}")))?;
        std::fs::write(&self.path, yaml).map_err(|e| {
            Error::Cassette(format!("failed to write {}: {e}", self.path.display()))
        })?;
        tracing::debug!(
            path = %self.path.display(),
            interactions = self.cassette.interactions.len(),
            "wrote cassette"
        );
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_in_order_and_writes_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fs.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "ci-fs", "deadbeef");
        recorder.record("fs", "read_to_string", json!({"path": "project.json"}), json!({"ok": "{}"}));
        recorder.record("fs", "is_dir", json!({"path": "./nginx"}), json!(true));
        recorder.record("fs", "write", json!({"path": "output.json"}), json!({"ok": null}));

        assert_eq!(recorder.finish().unwrap(), path);

        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cassette.name, "ci-fs");
        assert_eq!(cassette.commit, "deadbeef");
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(cassette.interactions[1].method, "is_dir");
        assert_eq!(cassette.interactions[1].output, json!(true));
    }

    #[test]
    fn finish_into_missing_directory_is_a_cassette_error() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = CassetteRecorder::new(dir.path().join("gone/git.cassette.yaml"), "x", "y");
        assert!(matches!(recorder.finish(), Err(Error::Cassette(_))));
    }
}
