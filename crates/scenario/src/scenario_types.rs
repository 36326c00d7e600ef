// ---------------------------------------------------------------------------
// Scenario snapshot structs and version constants
// ---------------------------------------------------------------------------
//
// The snapshot is the on-disk/over-the-wire shape of a calculation session.
// Keys are camelCase. Every field has a default so partial payloads load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use engine::config::{
    DEFAULT_ACTIVE_SECTION, DEFAULT_HORIZON_YEARS, DEFAULT_JURISDICTION, DEFAULT_REDUCTION_TARGET,
    DEFAULT_REGION,
};

// ---------------------------------------------------------------------------
// Version constants
// ---------------------------------------------------------------------------

/// Current snapshot version.
/// v0 = unversioned legacy payloads (`inputs`, `strategies`)
/// v1 = `rawInputs`, `reductionStrategies`, `version` field
/// v2 = explicit `reductionType` on every strategy
/// v3 = `emissions.total` always equals the scope sum
pub const CURRENT_SCENARIO_VERSION: u32 = 3;

// ---------------------------------------------------------------------------
// Snapshot structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedEmissions {
    pub scope1: f64,
    pub scope2: f64,
    pub scope3: f64,
    pub total: f64,
}

/// Enum-valued fields are kept as text so an unknown value degrades to the
/// default instead of rejecting the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedStrategy {
    pub id: String,
    pub category: String,
    pub reduction_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction_potential: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction_tonnes: Option<f64>,
    pub implementation_cost: String,
    pub timeframe: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_realization_year: Option<i32>,
    pub yearly_reductions: BTreeMap<i32, f64>,
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedOrganization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_type: Option<String>,
    pub employee_count: u32,
    pub facility_count: u32,
    pub annual_revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedCreditSelection {
    pub project_id: String,
    pub selected_quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_tonne: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedCreditProject {
    pub id: String,
    pub name: String,
    pub credit_type: String,
    pub available_credits: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_tonne: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioSnapshot {
    pub version: u32,
    /// Activity entries as typed: JSON numbers or text.
    pub raw_inputs: BTreeMap<String, serde_json::Value>,
    /// Tonnes CO2e per source at save time. Informational; recomputed on load.
    pub emission_values: BTreeMap<String, f64>,
    pub reduction_strategies: Vec<SavedStrategy>,
    pub reduction_target: f64,
    pub active_section: String,
    /// Scope totals at save time. Informational; recomputed on load.
    pub emissions: SavedEmissions,
    pub region: String,
    pub jurisdiction: String,
    pub organization: SavedOrganization,
    pub credit_selections: Vec<SavedCreditSelection>,
    pub credit_projects: Vec<SavedCreditProject>,
    pub horizon_years: u32,
}

impl Default for ScenarioSnapshot {
    fn default() -> Self {
        Self {
            version: CURRENT_SCENARIO_VERSION,
            raw_inputs: BTreeMap::new(),
            emission_values: BTreeMap::new(),
            reduction_strategies: Vec::new(),
            reduction_target: DEFAULT_REDUCTION_TARGET,
            active_section: DEFAULT_ACTIVE_SECTION.to_string(),
            emissions: SavedEmissions::default(),
            region: DEFAULT_REGION.to_string(),
            jurisdiction: DEFAULT_JURISDICTION.to_string(),
            organization: SavedOrganization::default(),
            credit_selections: Vec::new(),
            credit_projects: Vec::new(),
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}
