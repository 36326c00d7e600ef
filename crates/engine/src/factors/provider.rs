//! Factor catalog providers and the fallback to built-in defaults.

use std::fmt;

use bevy::prelude::*;

use super::catalog::{EmissionFactor, FactorCatalog};

/// Errors a catalog provider can report. The engine never surfaces these to
/// its callers; they only decide whether the built-in catalog is used.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The provider could not be reached or timed out.
    Unavailable(String),
    /// The provider answered with data that could not be parsed.
    Malformed(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Unavailable(msg) => write!(f, "Factor catalog unavailable: {msg}"),
            CatalogError::Malformed(msg) => write!(f, "Factor catalog malformed: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Malformed(e.to_string())
    }
}

/// External source of emission factors for a region and reporting year.
///
/// Implementations may block (network, disk); the engine only calls them from
/// the async compute pool, never from a calculation.
pub trait FactorCatalogProvider: Send + Sync + 'static {
    fn get(&self, region: &str, year: i32) -> Result<Vec<EmissionFactor>, CatalogError>;
}

/// Provider backed by a JSON document (array of `EmissionFactor`).
#[derive(Debug, Clone)]
pub struct JsonCatalogProvider {
    json: String,
}

impl JsonCatalogProvider {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl FactorCatalogProvider for JsonCatalogProvider {
    fn get(&self, region: &str, _year: i32) -> Result<Vec<EmissionFactor>, CatalogError> {
        let factors: Vec<EmissionFactor> = serde_json::from_str(&self.json)?;
        // Keep generic rows and rows for the requested region only.
        Ok(factors
            .into_iter()
            .filter(|f| f.region_code.is_none() || f.is_for_region(region))
            .collect())
    }
}

/// Fetch a catalog from `provider`, substituting the built-in set on failure
/// or on an empty answer. Never errors.
pub fn catalog_or_default(
    provider: &dyn FactorCatalogProvider,
    region: &str,
    year: i32,
) -> FactorCatalog {
    match provider.get(region, year) {
        Ok(factors) if !factors.is_empty() => {
            info!(
                "Loaded {} emission factors for region {} ({})",
                factors.len(),
                region,
                year
            );
            FactorCatalog::from_provider(factors, region, year)
        }
        Ok(_) => {
            warn!(
                "Factor provider returned no factors for {} ({}); using built-in defaults",
                region, year
            );
            FactorCatalog::builtin()
        }
        Err(e) => {
            warn!("{e}; using built-in defaults");
            FactorCatalog::builtin()
        }
    }
}
