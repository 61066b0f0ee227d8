//! The build plan written at the end of a run.

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::matcher::{PatternSource, UnitMatcher};
use crate::metadata::{ProjectMetadata, Tier, Unit, UnitMetadata};
use crate::ports::FileSystem;
use crate::resolver::Resolution;

/// A resolved unit together with its metadata, when that could be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUnit {
    /// The declared unit.
    pub unit: Unit,
    /// Contents of its `metadata.json`; `None` for pattern units and units
    /// whose directory is absent.
    pub metadata: Option<UnitMetadata>,
}

/// Resolution plus per-unit metadata, in build order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    /// Product units to build, in order.
    pub products: Vec<ResolvedUnit>,
    /// Infra units to build, in order.
    pub infra: Vec<ResolvedUnit>,
}

/// Serialized form of a [`TargetReport`].
#[derive(Debug, Serialize)]
struct TargetOutput<'a> {
    products: Vec<&'a str>,
    infra: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matrix: Option<Matrix>,
}

#[derive(Debug, Serialize)]
struct Matrix {
    products: Vec<String>,
    infra: Vec<String>,
}

impl TargetReport {
    /// Loads unit metadata for every resolved unit that has a directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] or [`Error::InvalidMetadata`] if a present
    /// unit's `metadata.json` is missing or malformed.
    pub fn load(
        resolution: &Resolution,
        project: &ProjectMetadata,
        matcher: &UnitMatcher,
        fs: &dyn FileSystem,
        root: &Path,
    ) -> Result<Self> {
        let load_tier = |names: &[String]| -> Result<Vec<ResolvedUnit>> {
            names
                .iter()
                .filter_map(|name| project.unit(name))
                .map(|unit| {
                    let metadata = load_unit_metadata(&unit, matcher.source(&unit.name), fs, root)?;
                    Ok(ResolvedUnit { unit, metadata })
                })
                .collect()
        };

        Ok(Self {
            products: load_tier(&resolution.products)?,
            infra: load_tier(&resolution.infra)?,
        })
    }

    /// Product unit names, in build order.
    pub fn product_names(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(|r| r.unit.name.as_str())
    }

    /// Infra unit names, in build order.
    pub fn infra_names(&self) -> impl Iterator<Item = &str> {
        self.infra.iter().map(|r| r.unit.name.as_str())
    }

    /// Renders the report as pretty-printed JSON with a trailing newline.
    ///
    /// With `matrix`, a `"matrix"` object lists one `name:version` entry per
    /// property; units without loaded metadata appear by name only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if serialization fails.
    pub fn to_json(&self, matrix: bool) -> Result<String> {
        let output = TargetOutput {
            products: self.product_names().collect(),
            infra: self.infra_names().collect(),
            matrix: matrix.then(|| Matrix {
                products: matrix_entries(&self.products),
                infra: matrix_entries(&self.infra),
            }),
        };
        let mut json = serde_json::to_string_pretty(&output).map_err(|e| Error::Write {
            path: Path::new("<report>").to_path_buf(),
            reason: e.to_string(),
        })?;
        json.push('\n');
        Ok(json)
    }

    /// Writes the JSON report to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the file cannot be written.
    pub fn write(&self, fs: &dyn FileSystem, path: &Path, matrix: bool) -> Result<()> {
        let json = self.to_json(matrix)?;
        fs.write(path, &json)
            .map_err(|e| Error::Write { path: path.to_path_buf(), reason: e.to_string() })?;
        tracing::info!(path = %path.display(), "saved build targets");
        Ok(())
    }

    /// One human-readable line per tier.
    #[must_use]
    pub fn summary(&self) -> String {
        let line = |tier: Tier, names: Vec<&str>| {
            if names.is_empty() {
                format!("{tier}: nothing to build")
            } else {
                format!("{tier}: {}", names.join(", "))
            }
        };
        format!(
            "{}\n{}",
            line(Tier::Product, self.product_names().collect()),
            line(Tier::Infra, self.infra_names().collect())
        )
    }
}

/// Loads a unit's `metadata.json` if its pattern came from an existing
/// directory; other units have nothing to load.
pub(crate) fn load_unit_metadata(
    unit: &Unit,
    source: Option<PatternSource>,
    fs: &dyn FileSystem,
    root: &Path,
) -> Result<Option<UnitMetadata>> {
    match source {
        Some(PatternSource::Directory) => {}
        Some(PatternSource::Verbatim) => {
            tracing::info!(unit = %unit.name, "pattern unit has no metadata to load");
            return Ok(None);
        }
        Some(PatternSource::Missing) | None => {
            tracing::info!(unit = %unit.name, "unit directory is absent, not loading metadata");
            return Ok(None);
        }
    }

    let metadata = UnitMetadata::load(fs, &root.join(unit.metadata_path()))?;
    if metadata.name != unit.name {
        tracing::warn!(
            unit = %unit.name,
            declared = %metadata.name,
            "metadata name differs from the unit name"
        );
    }
    Ok(Some(metadata))
}

fn matrix_entries(units: &[ResolvedUnit]) -> Vec<String> {
    units
        .iter()
        .flat_map(|r| match &r.metadata {
            Some(metadata) if !metadata.properties.is_empty() => {
                metadata.versions().map(|v| format!("{}:{v}", r.unit.name)).collect::<Vec<_>>()
            }
            _ => vec![r.unit.name.clone()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver;
    use crate::testing::MemFs;
    use std::collections::BTreeSet;

    const PROJECT: &str = r#"{
        "infra_priority": {"base": 1},
        "products_priority": {"api": 2, "web": 1, "ghost": 3}
    }"#;

    fn setup() -> (ProjectMetadata, MemFs) {
        let project = ProjectMetadata::from_json(PROJECT, Path::new("project.json")).unwrap();
        let fs = MemFs::new()
            .with_file("base/metadata.json", r#"{"name": "base", "properties": [{"version": "3.19"}]}"#)
            .with_file(
                "api/metadata.json",
                r#"{"name": "api", "properties": [{"version": "1.0"}, {"version": "2.0"}]}"#,
            )
            .with_file("web/metadata.json", r#"{"name": "website", "properties": [{"version": "5"}]}"#);
        (project, fs)
    }

    fn report_for(changed: &[&str]) -> (TargetReport, MemFs) {
        let (project, fs) = setup();
        let matcher = UnitMatcher::build(&project, &fs, Path::new(".")).unwrap();
        let changed: BTreeSet<String> = changed.iter().map(ToString::to_string).collect();
        let resolution = resolver::resolve(&changed, &project);
        let report = TargetReport::load(&resolution, &project, &matcher, &fs, Path::new(".")).unwrap();
        (report, fs)
    }

    #[test]
    fn empty_report_serializes_both_keys() {
        let (report, _) = report_for(&[]);
        assert_eq!(report.to_json(false).unwrap(), "{\n  \"products\": [],\n  \"infra\": []\n}\n");
    }

    #[test]
    fn loads_metadata_only_for_present_units() {
        let (report, fs) = report_for(&["base"]);

        assert_eq!(report.infra_names().collect::<Vec<_>>(), vec!["base"]);
        assert_eq!(report.product_names().collect::<Vec<_>>(), vec!["web", "api", "ghost"]);
        let ghost = &report.products[2];
        assert!(ghost.metadata.is_none());
        assert_eq!(report.products[1].metadata.as_ref().unwrap().properties.len(), 2);

        let reads = fs.reads();
        assert!(!reads.iter().any(|p| p.starts_with("ghost")));
    }

    #[test]
    fn name_mismatch_is_not_fatal() {
        let (report, _) = report_for(&["web"]);
        assert_eq!(report.products[0].metadata.as_ref().unwrap().name, "website");
    }

    #[test]
    fn missing_metadata_for_present_unit_is_fatal() {
        let project =
            ProjectMetadata::from_json(r#"{"products_priority": {"api": 1}}"#, Path::new("p.json")).unwrap();
        let fs = MemFs::new().with_file("api/main.go", "package main");
        let matcher = UnitMatcher::build(&project, &fs, Path::new(".")).unwrap();
        let resolution = Resolution { products: vec!["api".into()], infra: vec![] };

        let err = TargetReport::load(&resolution, &project, &matcher, &fs, Path::new(".")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn matrix_lists_every_version() {
        let (report, _) = report_for(&["base"]);
        let value: serde_json::Value = serde_json::from_str(&report.to_json(true).unwrap()).unwrap();
        assert_eq!(value["matrix"]["infra"], serde_json::json!(["base:3.19"]));
        assert_eq!(value["matrix"]["products"], serde_json::json!(["web:5", "api:1.0", "api:2.0", "ghost"]));
    }

    #[test]
    fn output_is_deterministic() {
        let (first, _) = report_for(&["api", "web"]);
        let (second, _) = report_for(&["web", "api"]);
        assert_eq!(first.to_json(true).unwrap(), second.to_json(true).unwrap());
    }

    #[test]
    fn write_goes_through_the_filesystem_port() {
        let (report, fs) = report_for(&["api"]);
        report.write(&fs, Path::new("out/output.json"), false).unwrap();
        let written = fs.file("out/output.json").unwrap();
        assert!(written.starts_with("{\n  \"products\": [\n    \"api\"\n  ],"));
        assert!(written.ends_with("}\n"));
    }

    #[test]
    fn summary_names_both_tiers() {
        let (report, _) = report_for(&["api"]);
        assert_eq!(report.summary(), "product: api\ninfra: nothing to build");
    }
}
