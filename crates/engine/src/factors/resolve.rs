//! Resolution of activity inputs against the factor catalog.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::activity::ActivityInput;
use crate::sources::{find_source, Scope, SourceDefinition};

use super::catalog::{EmissionFactor, FactorCatalog};

/// Which catalog tier produced a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactorOrigin {
    Regional,
    Generic,
    /// No factor matched; the contribution is zero.
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFactor {
    pub value: f64,
    pub origin: FactorOrigin,
    /// Catalog name of the factor that matched.
    pub matched_name: Option<String>,
}

impl ResolvedFactor {
    fn missing() -> Self {
        Self {
            value: 0.0,
            origin: FactorOrigin::Missing,
            matched_name: None,
        }
    }
}

/// Emissions of one activity source, in kg CO2e.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceContribution {
    pub source_id: String,
    pub scope: Scope,
    pub quantity: f64,
    pub factor: f64,
    pub origin: FactorOrigin,
    pub kg_co2e: f64,
}

/// Lower is better. Exact name beats substring; matching category breaks ties.
fn match_rank(factor: &EmissionFactor, family: &str, category: &str) -> Option<u8> {
    let name = factor.name.trim().to_lowercase();
    let family = family.trim().to_lowercase();
    if family.is_empty() {
        return None;
    }
    let name_rank = if name == family {
        0
    } else if name.contains(&family) {
        2
    } else {
        return None;
    };
    let category_rank = if factor.category.trim().eq_ignore_ascii_case(category) {
        0
    } else {
        1
    };
    Some(name_rank + category_rank)
}

fn best_match<'a>(
    candidates: impl Iterator<Item = &'a EmissionFactor>,
    family: &str,
    category: &str,
) -> Option<&'a EmissionFactor> {
    let mut best: Option<(u8, &EmissionFactor)> = None;
    for factor in candidates {
        if let Some(rank) = match_rank(factor, family, category) {
            // Strict `<` keeps the first catalog row among equal ranks.
            if best.map_or(true, |(r, _)| rank < r) {
                best = Some((rank, factor));
            }
        }
    }
    best.map(|(_, f)| f)
}

fn usable_value(factor: &EmissionFactor) -> f64 {
    if factor.value.is_finite() && factor.value >= 0.0 {
        factor.value
    } else {
        warn!(
            "Emission factor '{}' has unusable value {}; treating as 0",
            factor.name, factor.value
        );
        0.0
    }
}

/// Resolve the factor for one source: regional, then generic, then zero.
/// Only region-sensitive sources consult the regional tier.
pub fn resolve_factor(
    source: &SourceDefinition,
    catalog: &FactorCatalog,
    region: &str,
) -> ResolvedFactor {
    let category = source.category.as_str();

    let regional = if source.is_region_sensitive() {
        best_match(
            catalog.factors().iter().filter(|f| f.is_for_region(region)),
            source.family,
            category,
        )
    } else {
        None
    };
    if let Some(factor) = regional {
        return ResolvedFactor {
            value: usable_value(factor),
            origin: FactorOrigin::Regional,
            matched_name: Some(factor.name.clone()),
        };
    }

    let generic = best_match(
        catalog.factors().iter().filter(|f| f.region_code.is_none()),
        source.family,
        category,
    );
    match generic {
        Some(factor) => ResolvedFactor {
            value: usable_value(factor),
            origin: FactorOrigin::Generic,
            matched_name: Some(factor.name.clone()),
        },
        None => {
            debug!(
                "No emission factor for family '{}' (source {}); contribution is zero",
                source.family, source.id
            );
            ResolvedFactor::missing()
        }
    }
}

/// Resolve every input into a kg CO2e contribution.
///
/// Inputs whose id is not in the source table cannot be scoped and are
/// skipped.
pub fn resolve(
    inputs: &[ActivityInput],
    catalog: &FactorCatalog,
    region: &str,
) -> Vec<SourceContribution> {
    let mut contributions = Vec::with_capacity(inputs.len());
    for input in inputs {
        let Some(source) = find_source(&input.id) else {
            debug!("Skipping activity input with unknown source id '{}'", input.id);
            continue;
        };
        let quantity = ActivityInput::new(input.id.clone(), input.quantity).quantity;
        let resolved = resolve_factor(source, catalog, region);
        contributions.push(SourceContribution {
            source_id: source.id.to_string(),
            scope: source.scope(),
            quantity,
            factor: resolved.value,
            origin: resolved.origin,
            kg_co2e: quantity * resolved.value,
        });
    }
    contributions
}

/// Per-source kg CO2e, summed over duplicate ids.
pub fn contributions_by_source(contributions: &[SourceContribution]) -> BTreeMap<String, f64> {
    let mut map = BTreeMap::new();
    for c in contributions {
        *map.entry(c.source_id.clone()).or_insert(0.0) += c.kg_co2e;
    }
    map
}
