//! Pure offset requirement and credit coverage calculations.

use serde::{Deserialize, Serialize};

use crate::config::SCOPE_SUM_TOLERANCE;
use crate::credits::{selection_credit_type, CarbonCreditSelection, CreditProject};
use crate::legislation::normalize_jurisdiction;

use super::rules::OffsetRuleTable;

/// Emissions left after a 42.5% science-based reduction.
pub const SCIENCE_BASED_REMAINING_SHARE: f64 = 0.575;
/// Emissions left after a 90% net-zero reduction.
pub const NET_ZERO_REMAINING_SHARE: f64 = 0.10;

/// Tonnes to offset under common voluntary commitments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VoluntaryBenchmarks {
    pub carbon_neutral: f64,
    pub science_based_target: f64,
    pub net_zero: f64,
}

impl VoluntaryBenchmarks {
    pub fn for_emissions(total_emissions: f64) -> Self {
        Self {
            carbon_neutral: total_emissions,
            science_based_target: total_emissions * SCIENCE_BASED_REMAINING_SHARE,
            net_zero: total_emissions * NET_ZERO_REMAINING_SHARE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetRequirement {
    /// Canonical jurisdiction name.
    pub jurisdiction: String,
    pub mandatory: bool,
    pub threshold_value: f64,
    pub is_required: bool,
    pub offset_percentage: Option<f64>,
    pub offset_amount: f64,
    pub allowed_credit_types: Vec<String>,
    pub voluntary_benchmarks: VoluntaryBenchmarks,
}

/// Mandatory offset volume and voluntary benchmarks for `total_emissions`
/// tonnes in `jurisdiction`. Jurisdictions without a rule have no mandatory
/// regime.
pub fn compute_offset_requirement(
    rules: &OffsetRuleTable,
    jurisdiction: &str,
    total_emissions: f64,
) -> OffsetRequirement {
    let total = if total_emissions.is_finite() {
        total_emissions.max(0.0)
    } else {
        0.0
    };
    let canonical = normalize_jurisdiction(jurisdiction);
    let benchmarks = VoluntaryBenchmarks::for_emissions(total);

    let Some(rule) = rules.rule_for(&canonical) else {
        return OffsetRequirement {
            jurisdiction: canonical,
            mandatory: false,
            threshold_value: 0.0,
            is_required: false,
            offset_percentage: None,
            offset_amount: 0.0,
            allowed_credit_types: rules.default_voluntary_credit_types.clone(),
            voluntary_benchmarks: benchmarks,
        };
    };

    let is_required = rule.mandatory && total > rule.threshold;
    let offset_percentage = if is_required {
        rule.tier_for(total).and_then(|t| t.percentage)
    } else {
        None
    };
    let offset_amount = offset_percentage
        .map(|pct| total * pct.clamp(0.0, 100.0) / 100.0)
        .unwrap_or(0.0);
    let allowed_credit_types = if is_required {
        rule.mandatory_credit_types.clone()
    } else if rule.voluntary_credit_types.is_empty() {
        rules.default_voluntary_credit_types.clone()
    } else {
        rule.voluntary_credit_types.clone()
    };

    OffsetRequirement {
        jurisdiction: canonical,
        mandatory: rule.mandatory,
        threshold_value: rule.threshold,
        is_required,
        offset_percentage,
        offset_amount,
        allowed_credit_types,
        voluntary_benchmarks: benchmarks,
    }
}

/// How selected credits cover an offset requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditCoverage {
    /// Tonnes whose credit type is allowed.
    pub eligible_tonnes: f64,
    /// Tonnes of disallowed types or unknown projects.
    pub ineligible_tonnes: f64,
    pub shortfall: f64,
    pub covered: bool,
}

pub fn assess_credit_coverage(
    requirement: &OffsetRequirement,
    selections: &[CarbonCreditSelection],
    projects: &[CreditProject],
) -> CreditCoverage {
    let mut eligible = 0.0;
    let mut ineligible = 0.0;
    for selection in selections {
        let tonnes = selection.selected_quantity as f64;
        let allowed = selection_credit_type(selection, projects).is_some_and(|credit_type| {
            requirement
                .allowed_credit_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(credit_type))
        });
        if allowed {
            eligible += tonnes;
        } else {
            ineligible += tonnes;
        }
    }
    let shortfall = (requirement.offset_amount - eligible).max(0.0);
    CreditCoverage {
        eligible_tonnes: eligible,
        ineligible_tonnes: ineligible,
        shortfall,
        covered: shortfall <= SCOPE_SUM_TOLERANCE,
    }
}
