//! `recalculate`: one pure pass from session snapshot to report.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compliance_score::{
    score_applicable, ComplianceWeights, InstrumentReadiness, READINESS_DISCLAIMER,
};
use crate::credits::total_spend;
use crate::factors::{resolve, FactorCatalog, SourceContribution};
use crate::legislation::{applicable_legislation, normalize_jurisdiction, LegislationTable};
use crate::offsets::{
    assess_credit_coverage, compute_offset_requirement, CreditCoverage, OffsetRequirement,
    OffsetRuleTable,
};
use crate::reduction::{
    first_year_meeting_target, project_timeline, ReductionStrategy, StrategyCostSummary,
    TargetSummary, TimelinePoint,
};
use crate::scopes::{aggregate, breakdown, ScopeEmissions, SourceBreakdown};

use super::state::CalculationSession;

/// Policy inputs a recalculation reads besides the session.
#[derive(Clone, Copy)]
pub struct RecalcContext<'a> {
    pub catalog: &'a FactorCatalog,
    pub offset_rules: &'a OffsetRuleTable,
    pub legislation: &'a LegislationTable,
    pub weights: &'a ComplianceWeights,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditSummary {
    pub total_tonnes: f64,
    pub total_spend: f64,
    pub selections: usize,
}

/// Everything the presentation layer renders, computed from one revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsReport {
    pub revision: u64,
    pub region: String,
    /// Canonical jurisdiction name.
    pub jurisdiction: String,
    pub emissions: ScopeEmissions,
    pub contributions: Vec<SourceContribution>,
    /// Largest source first.
    pub breakdown: Vec<SourceBreakdown>,
    pub start_year: i32,
    pub timeline: Vec<TimelinePoint>,
    pub target: TargetSummary,
    pub first_year_meeting_target: Option<i32>,
    pub cost_summary: StrategyCostSummary,
    pub credits: CreditSummary,
    pub offset: OffsetRequirement,
    pub credit_coverage: CreditCoverage,
    pub legislation: Vec<InstrumentReadiness>,
    pub disclaimer: String,
}

/// Latest report written by the recalculation system.
#[derive(Resource, Debug, Clone, Default)]
pub struct LatestReport {
    pub report: Option<EmissionsReport>,
}

impl LatestReport {
    pub fn get(&self) -> Option<&EmissionsReport> {
        self.report.as_ref()
    }

    /// Whether the stored report reflects `revision`.
    pub fn is_current(&self, revision: u64) -> bool {
        self.report.as_ref().is_some_and(|r| r.revision == revision)
    }
}

/// Strategies with schedules recomputed against `baseline`.
///
/// Percentage strategies follow the current inventory, so a schedule stored at
/// confirmation time is refreshed whenever the inputs change.
pub fn rebaselined_strategies(strategies: &[ReductionStrategy], baseline: f64) -> Vec<ReductionStrategy> {
    strategies.iter().map(|s| s.rebaselined(baseline)).collect()
}

/// Compute a full report. Pure: the same session and context always give the
/// same report.
pub fn recalculate(session: &CalculationSession, ctx: RecalcContext<'_>) -> EmissionsReport {
    let inputs = session.inputs.to_activity_inputs();
    let contributions = resolve(&inputs, ctx.catalog, &session.region);
    let emissions = aggregate(&contributions);
    let breakdown = breakdown(&contributions);
    let baseline = emissions.total;

    let strategies = rebaselined_strategies(&session.strategies, baseline);
    let credit_total = session.credit_total();
    let start_year = session.start_year();
    let timeline = project_timeline(
        baseline,
        &strategies,
        credit_total,
        session.reduction_target,
        start_year,
        session.horizon_years,
    );
    let target = TargetSummary::compute(baseline, session.reduction_target, &strategies);
    let cost_summary = StrategyCostSummary::compute(&strategies, baseline);

    let jurisdiction = normalize_jurisdiction(&session.jurisdiction);
    let offset = compute_offset_requirement(ctx.offset_rules, &jurisdiction, baseline);
    let credit_coverage =
        assess_credit_coverage(&offset, &session.credit_selections, &session.credit_projects);

    let org = &session.organization;
    let applicable = applicable_legislation(
        ctx.legislation,
        &jurisdiction,
        org.revenue(),
        org.employee_count as f64,
        baseline,
    );
    let legislation = score_applicable(ctx.weights, &applicable, org, &emissions, &strategies);

    EmissionsReport {
        revision: session.revision,
        region: session.region.clone(),
        jurisdiction,
        emissions,
        contributions,
        breakdown,
        start_year,
        first_year_meeting_target: first_year_meeting_target(&timeline),
        timeline,
        target,
        cost_summary,
        credits: CreditSummary {
            total_tonnes: credit_total,
            total_spend: total_spend(&session.credit_selections),
            selections: session.credit_selections.len(),
        },
        offset,
        credit_coverage,
        legislation,
        disclaimer: READINESS_DISCLAIMER.to_string(),
    }
}

/// Current inventory total for `session`, in tonnes. Used when confirming a
/// strategy between recalculations.
pub fn baseline_total(session: &CalculationSession, catalog: &FactorCatalog) -> f64 {
    let inputs = session.inputs.to_activity_inputs();
    aggregate(&resolve(&inputs, catalog, &session.region)).total
}
