//! `EmissionFactor` and the `FactorCatalog` resource.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::defaults::BUILTIN_FACTORS;

/// One catalog row. `value` is kg CO2e per activity unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    pub value: f64,
}

impl EmissionFactor {
    pub fn generic(name: impl Into<String>, category: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            region_code: None,
            value,
        }
    }

    pub fn regional(
        name: impl Into<String>,
        category: impl Into<String>,
        region_code: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            region_code: Some(region_code.into()),
            value,
        }
    }

    /// Whether this factor applies to `region` (case-insensitive).
    pub fn is_for_region(&self, region: &str) -> bool {
        self.region_code
            .as_deref()
            .is_some_and(|code| code.trim().eq_ignore_ascii_case(region.trim()))
    }
}

/// Where the active catalog came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogOrigin {
    /// Compiled-in defaults.
    Builtin,
    /// Fetched from a provider for the given region/year.
    Provider { region: String, year: i32 },
}

/// The factor set used for resolution. Immutable for the length of a
/// calculation; replacing the resource marks the session dirty.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorCatalog {
    factors: Vec<EmissionFactor>,
    origin: CatalogOrigin,
}

impl Default for FactorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FactorCatalog {
    /// The compiled-in default factor set.
    pub fn builtin() -> Self {
        let factors = BUILTIN_FACTORS
            .iter()
            .map(|row| EmissionFactor {
                name: row.name.to_string(),
                category: row.category.to_string(),
                region_code: row.region_code.map(str::to_string),
                value: row.value,
            })
            .collect();
        Self {
            factors,
            origin: CatalogOrigin::Builtin,
        }
    }

    pub fn from_provider(factors: Vec<EmissionFactor>, region: &str, year: i32) -> Self {
        Self {
            factors,
            origin: CatalogOrigin::Provider {
                region: region.to_string(),
                year,
            },
        }
    }

    /// An empty catalog: every source resolves to zero.
    pub fn empty() -> Self {
        Self {
            factors: Vec::new(),
            origin: CatalogOrigin::Builtin,
        }
    }

    pub fn factors(&self) -> &[EmissionFactor] {
        &self.factors
    }

    pub fn origin(&self) -> &CatalogOrigin {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Add or replace a factor (same name, category and region).
    pub fn upsert(&mut self, factor: EmissionFactor) {
        let existing = self.factors.iter_mut().find(|f| {
            f.name.eq_ignore_ascii_case(&factor.name)
                && f.category.eq_ignore_ascii_case(&factor.category)
                && f.region_code.as_deref().map(str::to_ascii_lowercase)
                    == factor.region_code.as_deref().map(str::to_ascii_lowercase)
        });
        match existing {
            Some(slot) => *slot = factor,
            None => self.factors.push(factor),
        }
    }
}
