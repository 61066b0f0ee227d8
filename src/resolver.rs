//! Priority resolution: turns the raw changed set into ordered build lists.
//!
//! An infra change escalates: every product unit must be rebuilt, and so
//! must every infra unit at or after the lowest changed infra priority.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::metadata::{ProjectMetadata, Tier};

/// Ordered build targets for both tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Product units, by ascending `(priority, name)`.
    pub products: Vec<String>,
    /// Infra units, by ascending `(priority, name)`.
    pub infra: Vec<String>,
}

impl Resolution {
    /// Returns `true` if nothing needs to be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.infra.is_empty()
    }
}

/// Applies tier partitioning and escalation to the raw changed set.
#[must_use]
pub fn resolve(changed: &BTreeSet<String>, project: &ProjectMetadata) -> Resolution {
    let mut changed_infra = BTreeSet::new();
    let mut changed_products = BTreeSet::new();
    for name in changed {
        match project.tier_of(name) {
            Some(Tier::Infra) => {
                changed_infra.insert(name.as_str());
            }
            Some(Tier::Product) => {
                changed_products.insert(name.as_str());
            }
            None => {
                tracing::debug!(unit = %name, "changed name is not declared in any tier, ignoring");
            }
        }
    }

    let min_infra = changed_infra.iter().map(|n| project.infra_priority[*n]).min();

    let Some(min_infra) = min_infra else {
        tracing::debug!("no infra unit changed");
        return Resolution {
            products: ordered(changed_products, &project.products_priority),
            infra: Vec::new(),
        };
    };

    tracing::info!(
        changed_infra = ?changed_infra,
        min_priority = min_infra,
        "infra changed, escalating to every product and later infra unit"
    );
    let infra = project
        .infra_priority
        .iter()
        .filter(|(_, priority)| **priority >= min_infra)
        .map(|(name, _)| name.as_str());
    let products = project.products_priority.keys().map(String::as_str);

    Resolution {
        products: ordered(products, &project.products_priority),
        infra: ordered(infra, &project.infra_priority),
    }
}

fn ordered<'a>(
    names: impl IntoIterator<Item = &'a str>,
    priorities: &BTreeMap<String, i64>,
) -> Vec<String> {
    let mut keyed: Vec<(i64, &str)> = names.into_iter().map(|n| (priorities[n], n)).collect();
    keyed.sort_unstable();
    keyed.dedup();
    keyed.into_iter().map(|(_, n)| n.to_string()).collect()
}
