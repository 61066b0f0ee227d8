//! Loading and validation of `project.json`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use super::{Tier, Unit};
use crate::error::{Error, Result};
use crate::ports::FileSystem;

/// On-disk shape of `project.json`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct RawProjectMetadata {
    #[serde(default)]
    infra_priority: BTreeMap<String, i64>,
    #[serde(default)]
    products_priority: BTreeMap<String, i64>,
    #[serde(default, alias = "global_paths")]
    global_path: Vec<String>,
    #[serde(default)]
    path_prefix: Option<String>,
}

/// Validated project metadata, read-only for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    /// Infra unit name → priority.
    pub infra_priority: BTreeMap<String, i64>,
    /// Product unit name → priority.
    pub products_priority: BTreeMap<String, i64>,
    /// Glob patterns whose change forces a full rebuild, de-duplicated in
    /// declaration order.
    pub global_paths: Vec<String>,
    /// Directory every unit lives under, `/`-separated, empty for the root.
    pub path_prefix: String,
}

impl ProjectMetadata {
    /// Reads and validates the project metadata file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the file cannot be read, and a configuration
    /// error if it is malformed or declares a unit in both tiers.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .map_err(|e| Error::Read { path: path.to_path_buf(), reason: e.to_string() })?;
        let metadata = Self::from_json(&content, path)?;
        tracing::debug!(
            path = %path.display(),
            infra = metadata.infra_priority.len(),
            products = metadata.products_priority.len(),
            global_paths = ?metadata.global_paths,
            "loaded project metadata"
        );
        Ok(metadata)
    }

    /// Parses and validates project metadata from a JSON string.
    ///
    /// `source` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] for malformed JSON or empty names,
    /// and [`Error::OverlappingTiers`] if a name appears in both tables.
    pub fn from_json(content: &str, source: &Path) -> Result<Self> {
        let raw: RawProjectMetadata = serde_json::from_str(content).map_err(|e| {
            Error::InvalidMetadata { path: source.to_path_buf(), reason: e.to_string() }
        })?;

        let invalid =
            |reason: String| Error::InvalidMetadata { path: source.to_path_buf(), reason };

        let mut names = raw.infra_priority.keys().chain(raw.products_priority.keys());
        if names.any(|n| n.trim().is_empty()) {
            return Err(invalid("unit names must not be empty".to_string()));
        }

        let overlap: Vec<String> = raw
            .infra_priority
            .keys()
            .filter(|name| raw.products_priority.contains_key(*name))
            .cloned()
            .collect();
        if !overlap.is_empty() {
            return Err(Error::OverlappingTiers(overlap));
        }

        let mut seen = HashSet::new();
        let mut global_paths = Vec::with_capacity(raw.global_path.len());
        for pattern in raw.global_path {
            if pattern.is_empty() {
                return Err(invalid("global paths must not be empty".to_string()));
            }
            if seen.insert(pattern.clone()) {
                global_paths.push(pattern);
            }
        }

        let path_prefix = raw
            .path_prefix
            .as_deref()
            .map(|p| p.trim_start_matches("./").trim_end_matches('/').to_string())
            .unwrap_or_default();

        Ok(Self {
            infra_priority: raw.infra_priority,
            products_priority: raw.products_priority,
            global_paths,
            path_prefix,
        })
    }

    /// Returns the tier a unit name was declared in, if any.
    #[must_use]
    pub fn tier_of(&self, name: &str) -> Option<Tier> {
        if self.infra_priority.contains_key(name) {
            Some(Tier::Infra)
        } else if self.products_priority.contains_key(name) {
            Some(Tier::Product)
        } else {
            None
        }
    }

    /// Looks up a declared unit by name.
    #[must_use]
    pub fn unit(&self, name: &str) -> Option<Unit> {
        let (priority, tier) = match self.infra_priority.get(name) {
            Some(p) => (*p, Tier::Infra),
            None => (*self.products_priority.get(name)?, Tier::Product),
        };
        Some(self.make_unit(name, priority, tier))
    }

    /// All declared units, ordered by tier, then priority, then name.
    #[must_use]
    pub fn units(&self) -> Vec<Unit> {
        let infra = self.infra_priority.iter().map(|(n, p)| self.make_unit(n, *p, Tier::Infra));
        let products =
            self.products_priority.iter().map(|(n, p)| self.make_unit(n, *p, Tier::Product));
        let mut units: Vec<Unit> = infra.chain(products).collect();
        units.sort_by(|a, b| (a.tier, a.priority, &a.name).cmp(&(b.tier, b.priority, &b.name)));
        units
    }

    /// Every declared unit name, in no particular tier order.
    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.infra_priority.keys().chain(self.products_priority.keys()).map(String::as_str)
    }

    fn make_unit(&self, name: &str, priority: i64, tier: Tier) -> Unit {
        let path = if self.path_prefix.is_empty() || super::is_glob_like(name) {
            name.trim_end_matches('/').to_string()
        } else {
            format!("{}/{}", self.path_prefix, name.trim_end_matches('/'))
        };
        Unit { name: name.to_string(), path, priority, tier }
    }
}
