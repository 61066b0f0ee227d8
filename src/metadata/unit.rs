//! Per-unit `metadata.json`: the buildable variants of one unit.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::ports::FileSystem;

/// External base image or artifact a property builds on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    /// Upstream artifact name.
    pub name: String,
    /// Upstream artifact version.
    pub version: String,
    /// Optional stack tag (e.g. `"alpine"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// One buildable variant of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Version this variant builds.
    pub version: String,
    /// Base image or artifact, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Upstream>,
    /// Package name → version. Sorted so output stays deterministic.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub dependencies: BTreeMap<String, String>,
}

fn null_as_empty<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Contents of a unit's `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMetadata {
    /// Name declared in the file.
    pub name: String,
    /// Buildable variants, in declaration order.
    pub properties: Vec<Property>,
}

impl UnitMetadata {
    /// Reads and validates a unit metadata file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the file cannot be read and
    /// [`Error::InvalidMetadata`] if it is malformed or incomplete.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .map_err(|e| Error::Read { path: path.to_path_buf(), reason: e.to_string() })?;
        let metadata = Self::from_json(&content, path)?;
        tracing::debug!(
            path = %path.display(),
            name = %metadata.name,
            versions = ?metadata.versions().collect::<Vec<_>>(),
            "loaded unit metadata"
        );
        Ok(metadata)
    }

    /// Parses and validates unit metadata from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] for malformed JSON, a missing or
    /// empty `name`, a missing `properties` list, or empty versions.
    pub fn from_json(content: &str, source: &Path) -> Result<Self> {
        let invalid =
            |reason: String| Error::InvalidMetadata { path: source.to_path_buf(), reason };

        let metadata: Self = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;

        if metadata.name.trim().is_empty() {
            return Err(invalid("`name` must not be empty".to_string()));
        }
        for (index, property) in metadata.properties.iter().enumerate() {
            if property.version.trim().is_empty() {
                return Err(invalid(format!("properties[{index}].version must not be empty")));
            }
            if let Some(upstream) = &property.upstream {
                if upstream.name.trim().is_empty() || upstream.version.trim().is_empty() {
                    return Err(invalid(format!(
                        "properties[{index}].upstream needs a name and a version"
                    )));
                }
            }
        }
        Ok(metadata)
    }

    /// Versions of every property, in declaration order.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.version.as_str())
    }
}
