//! Built-in factor set, used when no provider catalog is available.
//!
//! Values are kg CO2e per activity unit and are representative published
//! figures (national inventory / IEA grid averages). They keep the engine
//! usable offline; a provider catalog should replace them for reporting.

/// Compile-time factor row.
#[derive(Debug, Clone, Copy)]
pub struct FactorRow {
    pub name: &'static str,
    pub category: &'static str,
    pub region_code: Option<&'static str>,
    pub value: f64,
}

const fn generic(name: &'static str, category: &'static str, value: f64) -> FactorRow {
    FactorRow {
        name,
        category,
        region_code: None,
        value,
    }
}

const fn grid(region: &'static str, value: f64) -> FactorRow {
    FactorRow {
        name: "Electricity",
        category: "electricity",
        region_code: Some(region),
        value,
    }
}

/// Generic grid electricity factor (kg CO2e / kWh), world average.
pub const GENERIC_GRID_FACTOR: f64 = 0.475;

pub const BUILTIN_FACTORS: &[FactorRow] = &[
    // Stationary combustion
    generic("Natural Gas", "stationary_combustion", 2.02),
    generic("Fuel Oil", "stationary_combustion", 2.76),
    generic("Coal", "stationary_combustion", 2.42),
    generic("LPG", "stationary_combustion", 1.56),
    // Mobile combustion
    generic("Diesel", "mobile_combustion", 2.68),
    generic("Petrol", "mobile_combustion", 2.31),
    // Refrigerants (GWP100 per kg leaked)
    generic("R-410A", "refrigerants", 2088.0),
    generic("R-134a", "refrigerants", 1430.0),
    // Process emissions are entered directly in kg CO2e
    generic("Process CO2e", "process", 1.0),
    // Agriculture and land
    generic("Cattle", "livestock", 2300.0),
    generic("Nitrogen Fertilizer", "fertilizers", 5.6),
    generic("Land Clearing", "land_use", 150_000.0),
    // Purchased energy
    generic("Electricity", "electricity", GENERIC_GRID_FACTOR),
    generic("Steam", "steam", 0.17),
    generic("District Heating", "heating", 0.17),
    generic("District Cooling", "cooling", 0.15),
    // Value chain
    generic("Purchased Goods", "purchased_goods", 0.35),
    generic("Air Travel", "business_travel", 0.15),
    generic("Rail Travel", "business_travel", 0.035),
    generic("Commuting", "commuting", 0.17),
    generic("Landfill Waste", "waste", 0.58),
    generic("Water Supply", "water", 0.344),
    // Regional grid electricity
    grid("AU", 0.68),
    grid("US", 0.386),
    grid("GB", 0.207),
    grid("DE", 0.366),
    grid("FR", 0.056),
    grid("CA", 0.12),
    grid("NZ", 0.10),
    grid("SG", 0.408),
    grid("CN", 0.555),
    grid("IN", 0.708),
    grid("JP", 0.457),
];
