//! Pattern matching of changed files against units and global paths.
//!
//! Every file is classified as one of:
//!
//! - **global**: matches a global path, every declared unit is changed
//! - **owned**: lies under exactly one unit
//! - **ambiguous**: lies under several units, a configuration error
//! - **unowned**: ignored
//!
//! Global paths are checked across all files before ownership, so the
//! outcome does not depend on the order of the changed-file list.

pub mod pattern;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use globset::{GlobSet, GlobSetBuilder};

pub use pattern::PatternSource;

use crate::error::{Error, Result};
use crate::metadata::ProjectMetadata;
use crate::ports::FileSystem;

/// Answers "which unit owns this path" for one run.
#[derive(Debug)]
pub struct UnitMatcher {
    /// Every declared unit name, matched or not.
    universe: BTreeSet<String>,
    sources: BTreeMap<String, PatternSource>,
    global_patterns: Vec<String>,
    globals: GlobSet,
    /// Unit name for each glob in `units`, by insertion index.
    owners: Vec<String>,
    units: GlobSet,
}

impl UnitMatcher {
    /// Builds a matcher for every unit declared in `project`, probing unit
    /// directories beneath `root` through `fs`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if a global path or a glob-named
    /// unit does not compile.
    pub fn build(project: &ProjectMetadata, fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let mut sources = BTreeMap::new();
        let mut unit_patterns = Vec::new();
        for unit in project.units() {
            let (source, pattern) = pattern::unit_pattern(&unit, fs, root);
            if let Some(pattern) = pattern {
                unit_patterns.push((unit.name.clone(), pattern));
            }
            sources.insert(unit.name, source);
        }

        let matcher = Self::new(
            project.unit_names().map(String::from),
            sources,
            unit_patterns,
            project.global_paths.clone(),
        )?;
        tracing::debug!(
            units = matcher.owners.len(),
            universe = matcher.universe.len(),
            global_paths = ?matcher.global_patterns,
            "built unit matcher"
        );
        Ok(matcher)
    }

    /// `universe` is the set of units marked changed when a global path
    /// matches; `unit_patterns` pairs unit names with their globs.
    fn new(
        universe: impl IntoIterator<Item = String>,
        sources: BTreeMap<String, PatternSource>,
        unit_patterns: Vec<(String, String)>,
        global_patterns: Vec<String>,
    ) -> Result<Self> {
        let mut globals = GlobSetBuilder::new();
        for p in &global_patterns {
            globals.add(pattern::compile(p)?);
        }

        let mut units = GlobSetBuilder::new();
        let mut owners = Vec::with_capacity(unit_patterns.len());
        for (name, p) in unit_patterns {
            units.add(pattern::compile(&p)?);
            owners.push(name);
        }

        let build = |builder: GlobSetBuilder| {
            builder.build().map_err(|e| Error::InvalidPattern {
                pattern: e.glob().unwrap_or_default().to_string(),
                reason: e.kind().to_string(),
            })
        };

        Ok(Self {
            universe: universe.into_iter().collect(),
            sources,
            global_patterns,
            globals: build(globals)?,
            owners,
            units: build(units)?,
        })
    }

    /// How the named unit got its pattern, if it is declared.
    #[must_use]
    pub fn source(&self, unit: &str) -> Option<PatternSource> {
        self.sources.get(unit).copied()
    }

    /// The first global pattern matching `file`, if any.
    #[must_use]
    pub fn global_match(&self, file: &str) -> Option<&str> {
        self.globals.matches(file).first().map(|&i| self.global_patterns[i].as_str())
    }

    /// The unit owning `file`, or `None` if no unit pattern matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousOwner`] if more than one unit matches.
    pub fn owner(&self, file: &str) -> Result<Option<&str>> {
        let hits = self.units.matches(file);
        match hits.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(self.owners[*only].as_str())),
            many => {
                let units: BTreeSet<&str> = many.iter().map(|&i| self.owners[i].as_str()).collect();
                Err(Error::AmbiguousOwner {
                    file: file.to_string(),
                    units: units.into_iter().map(String::from).collect(),
                })
            }
        }
    }

    /// Computes the raw set of changed unit names for a changed-file list.
    ///
    /// Empty entries and duplicates are tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousOwner`] for the first file (in list order)
    /// that more than one unit claims, unless a global path matched.
    pub fn changed_units(&self, files: &[String]) -> Result<BTreeSet<String>> {
        let files: Vec<&str> = files.iter().map(String::as_str).filter(|f| !f.is_empty()).collect();

        for file in &files {
            if let Some(pattern) = self.global_match(file) {
                tracing::info!(file, pattern, "global path changed, every unit must be built");
                return Ok(self.universe.clone());
            }
        }

        let mut changed = BTreeSet::new();
        for file in files {
            match self.owner(file)? {
                Some(unit) => {
                    tracing::debug!(file, unit, "file belongs to unit");
                    changed.insert(unit.to_string());
                }
                None => tracing::debug!(file, "ignoring path, no unit pattern matches"),
            }
        }

        tracing::info!(changed = ?changed, "changed units");
        Ok(changed)
    }
}
