//! Bevy systems driving recalculation off the session's dirty flag.

use std::time::Duration;

use bevy::prelude::*;

use crate::compliance_score::ComplianceWeights;
use crate::factors::FactorCatalog;
use crate::legislation::LegislationTable;
use crate::offsets::OffsetRuleTable;

use super::recalculate::{recalculate, LatestReport, RecalcContext};
use super::state::CalculationSession;

/// Sent after `LatestReport` is replaced.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportUpdated {
    pub revision: u64,
}

/// Quiet period after the last edit before recalculating. Zero recalculates
/// on the same update as the edit.
#[derive(Resource, Debug, Clone, Default)]
pub struct RecalcThrottle {
    pub quiet_period: Duration,
    last_seen_revision: u64,
    changed_at: Duration,
}

impl RecalcThrottle {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            ..Default::default()
        }
    }

    /// Note the session revision at `now`; true once it has been stable for
    /// the quiet period.
    pub fn settled(&mut self, revision: u64, now: Duration) -> bool {
        if revision != self.last_seen_revision {
            self.last_seen_revision = revision;
            self.changed_at = now;
        }
        now.saturating_sub(self.changed_at) >= self.quiet_period
    }
}

/// Run condition: the session needs a new report.
pub fn session_is_dirty(session: Res<CalculationSession>) -> bool {
    session.dirty
}

/// Policy resources feed every calculation; replacing one invalidates the
/// current report.
pub fn mark_dirty_on_policy_change(
    catalog: Res<FactorCatalog>,
    rules: Res<OffsetRuleTable>,
    legislation: Res<LegislationTable>,
    weights: Res<ComplianceWeights>,
    mut session: ResMut<CalculationSession>,
) {
    let changed = catalog.is_changed()
        || rules.is_changed()
        || legislation.is_changed()
        || weights.is_changed();
    if changed && !session.dirty {
        debug!("Policy resources changed; session marked dirty");
        session.dirty = true;
    }
}

/// Recompute the report for a dirty session once the throttle allows it.
#[allow(clippy::too_many_arguments)]
pub fn recalculate_session(
    time: Res<Time>,
    mut throttle: ResMut<RecalcThrottle>,
    mut session: ResMut<CalculationSession>,
    catalog: Res<FactorCatalog>,
    rules: Res<OffsetRuleTable>,
    legislation: Res<LegislationTable>,
    weights: Res<ComplianceWeights>,
    mut latest: ResMut<LatestReport>,
    mut updated: EventWriter<ReportUpdated>,
) {
    if !throttle.settled(session.revision, time.elapsed()) {
        return;
    }

    let ctx = RecalcContext {
        catalog: &catalog,
        offset_rules: &rules,
        legislation: &legislation,
        weights: &weights,
    };
    let report = recalculate(&session, ctx);
    debug!(
        "Recalculated revision {}: {:.3} tCO2e ({} sources)",
        report.revision,
        report.emissions.total,
        report.contributions.len()
    );

    let revision = report.revision;
    latest.report = Some(report);
    session.dirty = false;
    updated.send(ReportUpdated { revision });
}
