//! In-memory port implementations shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use crate::ports::{FileSystem, GitRepo, PortError, RevisionRange};

fn normalize(path: &Path) -> PathBuf {
    path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
}

/// In-memory filesystem for testing without touching disk.
pub(crate) struct MemFs {
    files: Mutex<HashMap<PathBuf, String>>,
    dirs: Mutex<HashSet<PathBuf>>,
    reads: Mutex<Vec<PathBuf>>,
}

impl MemFs {
    pub(crate) fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            dirs: Mutex::new(HashSet::new()),
            reads: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_file(self, path: &str, contents: &str) -> Self {
        self.files.lock().unwrap().insert(normalize(Path::new(path)), contents.to_string());
        self
    }

    pub(crate) fn with_dir(self, path: &str) -> Self {
        self.dirs.lock().unwrap().insert(normalize(Path::new(path)));
        self
    }

    pub(crate) fn file(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(&normalize(Path::new(path))).cloned()
    }

    /// Every path passed to `read_to_string`, in call order.
    pub(crate) fn reads(&self) -> Vec<PathBuf> {
        self.reads.lock().unwrap().clone()
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        self.reads.lock().unwrap().push(normalize(path));
        self.files
            .lock()
            .unwrap()
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        self.files.lock().unwrap().insert(normalize(path), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let is_file = self.files.lock().unwrap().contains_key(&normalize(path));
        is_file || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = normalize(path);
        if self.dirs.lock().unwrap().contains(&path) {
            return true;
        }
        let files = self.files.lock().unwrap();
        files.keys().any(|k| k.starts_with(&path) && *k != path)
    }
}

/// Git double returning canned `diff --name-only` output.
pub(crate) struct FakeGit {
    diff: Result<String, String>,
    last_range: Mutex<Option<Option<RevisionRange>>>,
}

impl FakeGit {
    pub(crate) fn with_diff(output: &str) -> Self {
        Self { diff: Ok(output.to_string()), last_range: Mutex::new(None) }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self { diff: Err(message.to_string()), last_range: Mutex::new(None) }
    }

    /// The range of the last `diff_names` call; `None` if never called.
    pub(crate) fn last_range(&self) -> Option<Option<RevisionRange>> {
        self.last_range.lock().unwrap().clone()
    }
}

impl GitRepo for FakeGit {
    fn current_commit(&self) -> Result<String, PortError> {
        Ok("0000000000000000000000000000000000000000".to_string())
    }

    fn diff_names(&self, range: Option<&RevisionRange>) -> Result<String, PortError> {
        *self.last_range.lock().unwrap() = Some(range.cloned());
        self.diff.clone().map_err(Into::into)
    }
}
