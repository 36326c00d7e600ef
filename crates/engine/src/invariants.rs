//! Runtime invariant validation for freshly written reports.
//!
//! Runs after each recalculation and logs a warning per violation. Counts are
//! kept so integration tests can assert a clean run.
//!
//! Validated invariants:
//! 1. **Scope sum**: `total` equals `scope1 + scope2 + scope3`.
//! 2. **Non-negative projection**: no timeline year projects below zero.
//! 3. **Finite shares**: every breakdown share is finite and within 0-100.
//! 4. **Bounded readiness**: no compliance percentage exceeds 100.

use bevy::prelude::*;

use crate::session::{EmissionsReport, LatestReport, ReportUpdated};
use crate::EngineSet;

/// Violations found in the most recently checked report.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct ReportInvariantViolations {
    pub reports_checked: u64,
    pub scope_sum: u32,
    pub negative_projection: u32,
    pub bad_share: u32,
    pub readiness_overflow: u32,
}

impl ReportInvariantViolations {
    pub fn total(&self) -> u32 {
        self.scope_sum + self.negative_projection + self.bad_share + self.readiness_overflow
    }
}

/// Count violations in `report`, logging each one.
pub fn check_report(report: &EmissionsReport) -> ReportInvariantViolations {
    let mut v = ReportInvariantViolations {
        reports_checked: 1,
        ..Default::default()
    };

    if !report.emissions.is_consistent() {
        warn!(
            "Invariant violation: revision {} total {} != scope sum {}",
            report.revision,
            report.emissions.total,
            report.emissions.scope1 + report.emissions.scope2 + report.emissions.scope3
        );
        v.scope_sum += 1;
    }

    for point in &report.timeline {
        if point.projected_emissions < 0.0 || !point.projected_emissions.is_finite() {
            warn!(
                "Invariant violation: revision {} projects {} tCO2e in {}",
                report.revision, point.projected_emissions, point.year
            );
            v.negative_projection += 1;
        }
    }

    for row in &report.breakdown {
        if !row.share_of_total.is_finite() || !(0.0..=100.0 + 1e-9).contains(&row.share_of_total) {
            warn!(
                "Invariant violation: source '{}' has share {}",
                row.source_id, row.share_of_total
            );
            v.bad_share += 1;
        }
    }

    for readiness in &report.legislation {
        if readiness.score.percentage > 100 || readiness.score.score > readiness.score.total_requirements {
            warn!(
                "Invariant violation: {} readiness {}/{}",
                readiness.instrument_id, readiness.score.score, readiness.score.total_requirements
            );
            v.readiness_overflow += 1;
        }
    }

    v
}

/// Check the report each time a new one is published.
pub fn validate_latest_report(
    mut updates: EventReader<ReportUpdated>,
    latest: Res<LatestReport>,
    mut violations: ResMut<ReportInvariantViolations>,
) {
    if updates.read().last().is_none() {
        return;
    }
    let Some(report) = latest.get() else {
        return;
    };
    let found = check_report(report);
    let checked = violations.reports_checked + 1;
    *violations = ReportInvariantViolations {
        reports_checked: checked,
        ..found
    };
}

pub struct ReportInvariantsPlugin;

impl Plugin for ReportInvariantsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReportInvariantViolations>().add_systems(
            Update,
            validate_latest_report.in_set(EngineSet::Report),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance_score::ComplianceWeights;
    use crate::factors::FactorCatalog;
    use crate::legislation::LegislationTable;
    use crate::offsets::OffsetRuleTable;
    use crate::session::{recalculate, CalculationSession, RecalcContext};

    fn report_for(session: &CalculationSession) -> EmissionsReport {
        let catalog = FactorCatalog::builtin();
        let rules = OffsetRuleTable::default();
        let legislation = LegislationTable::default();
        let weights = ComplianceWeights::default();
        recalculate(
            session,
            RecalcContext {
                catalog: &catalog,
                offset_rules: &rules,
                legislation: &legislation,
                weights: &weights,
            },
        )
    }

    #[test]
    fn test_clean_report_has_no_violations() {
        let mut session = CalculationSession::default();
        session.inputs.set_quantity("electricity", 50_000.0);
        session.inputs.set_quantity("natural_gas", 1_000.0);
        let v = check_report(&report_for(&session));
        assert_eq!(v.total(), 0);
        assert_eq!(v.reports_checked, 1);
    }

    #[test]
    fn test_tampered_report_is_flagged() {
        let mut report = report_for(&CalculationSession::default());
        report.emissions.total += 5.0;
        if let Some(point) = report.timeline.first_mut() {
            point.projected_emissions = -1.0;
        }
        let v = check_report(&report);
        assert_eq!(v.scope_sum, 1);
        assert_eq!(v.negative_projection, 1);
    }
}
