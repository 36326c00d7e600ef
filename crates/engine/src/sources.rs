//! Activity source table: every activity the engine knows how to account for.
//!
//! | Scope | Categories                                                              |
//! |-------|-------------------------------------------------------------------------|
//! | 1     | stationary, mobile, refrigerants, process, livestock, fertilizers, land use |
//! | 2     | electricity, steam, heating, cooling                                    |
//! | 3     | purchased goods, business travel, commuting, waste, water               |
//!
//! Each source names the factor *family* it resolves against. Lookup into the
//! factor catalog is by family name, so a catalog can rename or regionalise
//! factors without touching this table.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// GHG Protocol scope.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub enum Scope {
    Scope1,
    Scope2,
    Scope3,
}

impl Scope {
    pub fn label(self) -> &'static str {
        match self {
            Scope::Scope1 => "Scope 1",
            Scope::Scope2 => "Scope 2",
            Scope::Scope3 => "Scope 3",
        }
    }

    pub fn all() -> [Scope; 3] {
        [Scope::Scope1, Scope::Scope2, Scope::Scope3]
    }
}

/// Emission source category. The category alone decides the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum SourceCategory {
    StationaryCombustion,
    MobileCombustion,
    Refrigerants,
    Process,
    Livestock,
    Fertilizers,
    LandUse,
    Electricity,
    Steam,
    Heating,
    Cooling,
    PurchasedGoods,
    BusinessTravel,
    Commuting,
    Waste,
    Water,
}

impl SourceCategory {
    /// Classification table: category -> scope.
    pub fn scope(self) -> Scope {
        match self {
            SourceCategory::StationaryCombustion
            | SourceCategory::MobileCombustion
            | SourceCategory::Refrigerants
            | SourceCategory::Process
            | SourceCategory::Livestock
            | SourceCategory::Fertilizers
            | SourceCategory::LandUse => Scope::Scope1,
            SourceCategory::Electricity
            | SourceCategory::Steam
            | SourceCategory::Heating
            | SourceCategory::Cooling => Scope::Scope2,
            SourceCategory::PurchasedGoods
            | SourceCategory::BusinessTravel
            | SourceCategory::Commuting
            | SourceCategory::Waste
            | SourceCategory::Water => Scope::Scope3,
        }
    }

    /// Identifier used in the `category` column of factor catalogs.
    pub fn as_str(self) -> &'static str {
        match self {
            SourceCategory::StationaryCombustion => "stationary_combustion",
            SourceCategory::MobileCombustion => "mobile_combustion",
            SourceCategory::Refrigerants => "refrigerants",
            SourceCategory::Process => "process",
            SourceCategory::Livestock => "livestock",
            SourceCategory::Fertilizers => "fertilizers",
            SourceCategory::LandUse => "land_use",
            SourceCategory::Electricity => "electricity",
            SourceCategory::Steam => "steam",
            SourceCategory::Heating => "heating",
            SourceCategory::Cooling => "cooling",
            SourceCategory::PurchasedGoods => "purchased_goods",
            SourceCategory::BusinessTravel => "business_travel",
            SourceCategory::Commuting => "commuting",
            SourceCategory::Waste => "waste",
            SourceCategory::Water => "water",
        }
    }
}

/// Static description of one activity source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceDefinition {
    /// Stable id used as the activity input key.
    pub id: &'static str,
    pub label: &'static str,
    pub category: SourceCategory,
    /// Factor family name looked up in the catalog.
    pub family: &'static str,
    /// Activity unit the user enters.
    pub unit: &'static str,
}

impl SourceDefinition {
    pub fn scope(&self) -> Scope {
        self.category.scope()
    }

    /// Whether the factor family has per-region values (grid electricity).
    pub fn is_region_sensitive(&self) -> bool {
        self.category == SourceCategory::Electricity
    }
}

const fn source(
    id: &'static str,
    label: &'static str,
    category: SourceCategory,
    family: &'static str,
    unit: &'static str,
) -> SourceDefinition {
    SourceDefinition {
        id,
        label,
        category,
        family,
        unit,
    }
}

/// All known activity sources.
pub const SOURCE_TABLE: &[SourceDefinition] = &[
    // Scope 1
    source("natural_gas", "Natural Gas", SourceCategory::StationaryCombustion, "Natural Gas", "m3"),
    source("heating_oil", "Heating Oil", SourceCategory::StationaryCombustion, "Fuel Oil", "L"),
    source("coal", "Coal", SourceCategory::StationaryCombustion, "Coal", "kg"),
    source("lpg", "LPG", SourceCategory::StationaryCombustion, "LPG", "L"),
    source("fleet_diesel", "Fleet Diesel", SourceCategory::MobileCombustion, "Diesel", "L"),
    source("fleet_petrol", "Fleet Petrol", SourceCategory::MobileCombustion, "Petrol", "L"),
    source("refrigerant_r410a", "R-410A Leakage", SourceCategory::Refrigerants, "R-410A", "kg"),
    source("refrigerant_r134a", "R-134a Leakage", SourceCategory::Refrigerants, "R-134a", "kg"),
    source("process_emissions", "Process Emissions", SourceCategory::Process, "Process CO2e", "kg CO2e"),
    source("livestock_cattle", "Cattle", SourceCategory::Livestock, "Cattle", "head"),
    source("nitrogen_fertilizer", "Nitrogen Fertilizer", SourceCategory::Fertilizers, "Nitrogen Fertilizer", "kg N"),
    source("land_use_change", "Land Clearing", SourceCategory::LandUse, "Land Clearing", "ha"),
    // Scope 2
    source("electricity", "Grid Electricity", SourceCategory::Electricity, "Electricity", "kWh"),
    source("purchased_steam", "Purchased Steam", SourceCategory::Steam, "Steam", "kWh"),
    source("district_heating", "District Heating", SourceCategory::Heating, "District Heating", "kWh"),
    source("district_cooling", "District Cooling", SourceCategory::Cooling, "District Cooling", "kWh"),
    // Scope 3
    source("purchased_goods", "Purchased Goods & Services", SourceCategory::PurchasedGoods, "Purchased Goods", "USD"),
    source("air_travel", "Business Air Travel", SourceCategory::BusinessTravel, "Air Travel", "passenger-km"),
    source("rail_travel", "Business Rail Travel", SourceCategory::BusinessTravel, "Rail Travel", "passenger-km"),
    source("employee_commuting", "Employee Commuting", SourceCategory::Commuting, "Commuting", "km"),
    source("waste_landfill", "Waste to Landfill", SourceCategory::Waste, "Landfill Waste", "kg"),
    source("water_supply", "Water Supply", SourceCategory::Water, "Water Supply", "m3"),
];

/// Look up a source by id (case-insensitive).
pub fn find_source(id: &str) -> Option<&'static SourceDefinition> {
    let id = id.trim();
    SOURCE_TABLE.iter().find(|s| s.id.eq_ignore_ascii_case(id))
}

/// Scope of a source id, `None` for ids outside the table.
pub fn classify(id: &str) -> Option<Scope> {
    find_source(id).map(SourceDefinition::scope)
}

/// Sources belonging to one scope, in table order.
pub fn sources_in_scope(scope: Scope) -> impl Iterator<Item = &'static SourceDefinition> {
    SOURCE_TABLE.iter().filter(move |s| s.scope() == scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_ids_are_unique() {
        for (i, a) in SOURCE_TABLE.iter().enumerate() {
            for b in &SOURCE_TABLE[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate source id");
            }
        }
    }

    #[test]
    fn test_classification_examples() {
        assert_eq!(classify("natural_gas"), Some(Scope::Scope1));
        assert_eq!(classify("fleet_diesel"), Some(Scope::Scope1));
        assert_eq!(classify("livestock_cattle"), Some(Scope::Scope1));
        assert_eq!(classify("electricity"), Some(Scope::Scope2));
        assert_eq!(classify("district_cooling"), Some(Scope::Scope2));
        assert_eq!(classify("air_travel"), Some(Scope::Scope3));
        assert_eq!(classify("water_supply"), Some(Scope::Scope3));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("ELECTRICITY"), Some(Scope::Scope2));
        assert_eq!(classify(" Coal "), Some(Scope::Scope1));
    }

    #[test]
    fn test_unknown_source_is_unclassified() {
        assert_eq!(classify("teleporter_fuel"), None);
    }

    #[test]
    fn test_only_grid_electricity_is_region_sensitive() {
        let sensitive: Vec<&str> = SOURCE_TABLE
            .iter()
            .filter(|s| s.is_region_sensitive())
            .map(|s| s.id)
            .collect();
        assert_eq!(sensitive, vec!["electricity"]);
    }

    #[test]
    fn test_every_scope_has_sources() {
        for scope in Scope::all() {
            assert!(sources_in_scope(scope).count() > 0, "{:?} has no sources", scope);
        }
    }
}
