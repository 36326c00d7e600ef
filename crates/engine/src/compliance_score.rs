//! Weighted data-completeness score per legislative instrument.
//!
//! Each requirement contributes its weight to the total; the score gains the
//! weight only when the attribute is present. The Scope 3 and reduction
//! strategy requirements count only for instruments that ask for them.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::legislation::{ApplicableInstrument, Instrument};
use crate::organization::{is_set, OrganizationProfile};
use crate::reduction::ReductionStrategy;
use crate::scopes::ScopeEmissions;

/// Shown with every score.
pub const READINESS_DISCLAIMER: &str = "Readiness scores measure data completeness only. \
They are not a legal determination of compliance; confirm obligations with a qualified advisor.";

/// Requirement weights. Policy, not contract: replace the resource to tune.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceWeights {
    pub organization_type: u32,
    pub employee_count: u32,
    pub facility_count: u32,
    pub annual_revenue: u32,
    pub industry_type: u32,
    pub reporting_year: u32,
    pub location: u32,
    pub scope1: u32,
    pub scope2: u32,
    pub scope3: u32,
    pub reduction_strategies: u32,
}

impl Default for ComplianceWeights {
    fn default() -> Self {
        Self {
            organization_type: 1,
            employee_count: 1,
            facility_count: 1,
            annual_revenue: 1,
            industry_type: 1,
            reporting_year: 1,
            location: 2,
            scope1: 3,
            scope2: 3,
            scope3: 2,
            reduction_strategies: 2,
        }
    }
}

/// Which optional requirements an instrument adds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRequirements {
    pub requires_scope3: bool,
    pub requires_reduction_targets: bool,
}

impl From<&Instrument> for ScoringRequirements {
    fn from(instrument: &Instrument) -> Self {
        Self {
            requires_scope3: instrument.requires_scope3,
            requires_reduction_targets: instrument.requires_reduction_targets,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceScore {
    pub score: u32,
    pub total_requirements: u32,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
    pub is_complete: bool,
}

pub fn score(
    weights: &ComplianceWeights,
    requirements: ScoringRequirements,
    organization: &OrganizationProfile,
    emissions: &ScopeEmissions,
    strategies: &[ReductionStrategy],
) -> ComplianceScore {
    let mut checks: Vec<(u32, bool)> = vec![
        (weights.organization_type, is_set(&organization.organization_type)),
        (weights.employee_count, organization.employee_count > 0),
        (weights.facility_count, organization.facility_count > 0),
        (weights.annual_revenue, organization.revenue() > 0.0),
        (weights.industry_type, is_set(&organization.industry_type)),
        (weights.reporting_year, organization.reporting_year.is_some()),
        (weights.location, is_set(&organization.location)),
        (weights.scope1, emissions.scope1 > 0.0),
        (weights.scope2, emissions.scope2 > 0.0),
    ];
    if requirements.requires_scope3 {
        checks.push((weights.scope3, emissions.scope3 > 0.0));
    }
    if requirements.requires_reduction_targets {
        checks.push((weights.reduction_strategies, !strategies.is_empty()));
    }

    let total: u32 = checks.iter().map(|(w, _)| w).sum();
    let met: u32 = checks.iter().filter(|(_, present)| *present).map(|(w, _)| w).sum();
    let percentage = if total == 0 {
        0
    } else {
        (100.0 * met as f64 / total as f64).round() as u32
    };

    ComplianceScore {
        score: met,
        total_requirements: total,
        percentage,
        is_complete: percentage == 100,
    }
}

/// Readiness for one applicable instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentReadiness {
    pub instrument_id: String,
    pub name: String,
    pub reason: String,
    pub mandatory: bool,
    pub score: ComplianceScore,
}

/// Score every applicable instrument.
pub fn score_applicable(
    weights: &ComplianceWeights,
    applicable: &[ApplicableInstrument],
    organization: &OrganizationProfile,
    emissions: &ScopeEmissions,
    strategies: &[ReductionStrategy],
) -> Vec<InstrumentReadiness> {
    applicable
        .iter()
        .map(|a| InstrumentReadiness {
            instrument_id: a.instrument.id.clone(),
            name: a.instrument.name.clone(),
            reason: a.reason.clone(),
            mandatory: a.instrument.is_mandatory(),
            score: score(
                weights,
                ScoringRequirements::from(&a.instrument),
                organization,
                emissions,
                strategies,
            ),
        })
        .collect()
}
