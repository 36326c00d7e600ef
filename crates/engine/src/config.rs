/// Kilograms per metric tonne. Contributions are resolved in kg CO2e and
/// reported in tonnes.
pub const KG_PER_TONNE: f64 = 1000.0;

/// Tolerance used when checking that scope totals add up.
pub const SCOPE_SUM_TOLERANCE: f64 = 1e-6;

/// Reduction target (percent of baseline) used when a scenario does not set one.
pub const DEFAULT_REDUCTION_TARGET: f64 = 20.0;

/// Number of years projected by the reduction timeline.
pub const DEFAULT_HORIZON_YEARS: u32 = 10;

/// Longest horizon the timeline will project.
pub const MAX_HORIZON_YEARS: u32 = 50;

/// First timeline year when the organization has no reporting year.
/// The engine never reads the wall clock, so this keeps projections deterministic.
pub const DEFAULT_START_YEAR: i32 = 2025;

/// Region code used for factor lookup when the session has none.
pub const DEFAULT_REGION: &str = "GLOBAL";

/// Jurisdiction label used when the session has none.
pub const DEFAULT_JURISDICTION: &str = "Australia";

/// Section shown first by the presentation layer.
pub const DEFAULT_ACTIVE_SECTION: &str = "inputs";

/// Earliest year accepted for reporting and implementation years.
pub const MIN_YEAR: i32 = 1900;

/// Latest year accepted for reporting and implementation years. Leaves room
/// for the longest horizon and realization curve without overflow.
pub const MAX_YEAR: i32 = 2200;

/// Clamp a user-supplied year into `MIN_YEAR..=MAX_YEAR`.
pub fn clamp_year(year: i32) -> i32 {
    year.clamp(MIN_YEAR, MAX_YEAR)
}
