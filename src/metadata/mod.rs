//! Project and unit metadata: the data model every stage works on.
//!
//! `project.json` is loaded once into [`ProjectMetadata`], which owns the two
//! priority tables and the global paths. A [`Unit`] is a derived view of one
//! table entry. Per-unit `metadata.json` files are loaded lazily into
//! [`UnitMetadata`] for resolved units only.

pub mod project;
pub mod unit;

use std::fmt;

use serde::Serialize;

pub use project::ProjectMetadata;
pub use unit::{Property, UnitMetadata, Upstream};

/// Default file name of the project metadata.
pub const PROJECT_METADATA_FILE_NAME: &str = "project.json";
/// File name of a unit's metadata inside its directory.
pub const UNIT_METADATA_FILE_NAME: &str = "metadata.json";

/// Characters that turn a unit name into a glob pattern.
const GLOB_METACHARS: [char; 4] = ['*', '?', '[', ']'];

/// Which priority table a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Infrastructure units; built first, depended upon by products.
    Infra,
    /// Final product units.
    Product,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infra => f.write_str("infra"),
            Self::Product => f.write_str("product"),
        }
    }
}

/// One buildable unit as declared in the priority tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Unique name (the key in its priority table).
    pub name: String,
    /// Repository-relative directory, `/`-separated, without trailing slash.
    pub path: String,
    /// Build order within the tier; lower builds first.
    pub priority: i64,
    /// The table the unit was declared in.
    pub tier: Tier,
}

impl Unit {
    /// Returns `true` if the unit's name is itself a glob pattern.
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        is_glob_like(&self.name)
    }

    /// Repository-relative path of the unit's `metadata.json`.
    #[must_use]
    pub fn metadata_path(&self) -> String {
        format!("{}/{UNIT_METADATA_FILE_NAME}", self.path)
    }
}

/// Returns `true` if `s` contains any glob metacharacter.
#[must_use]
pub fn is_glob_like(s: &str) -> bool {
    s.contains(GLOB_METACHARS)
}
