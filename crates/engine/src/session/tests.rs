use std::time::Duration;

use crate::compliance_score::ComplianceWeights;
use crate::factors::FactorCatalog;
use crate::legislation::LegislationTable;
use crate::offsets::OffsetRuleTable;
use crate::reduction::{ReductionStrategy, StrategyFields, Timeframe};
use crate::session::*;

struct Policy {
    catalog: FactorCatalog,
    rules: OffsetRuleTable,
    legislation: LegislationTable,
    weights: ComplianceWeights,
}

impl Policy {
    fn new() -> Self {
        Self {
            catalog: FactorCatalog::builtin(),
            rules: OffsetRuleTable::default(),
            legislation: LegislationTable::default(),
            weights: ComplianceWeights::default(),
        }
    }

    fn ctx(&self) -> RecalcContext<'_> {
        RecalcContext {
            catalog: &self.catalog,
            offset_rules: &self.rules,
            legislation: &self.legislation,
            weights: &self.weights,
        }
    }
}

fn sample_session() -> CalculationSession {
    let mut session = CalculationSession {
        region: "AU".to_string(),
        jurisdiction: "au".to_string(),
        ..Default::default()
    };
    // 100,000,000 kWh * 0.68 = 68,000 t
    session.inputs.set_quantity("electricity", 100_000_000.0);
    // 1,000,000 L * 2.68 = 2,680 t
    session.inputs.set_quantity("fleet_diesel", 1_000_000.0);
    session.organization.employee_count = 600;
    session
}

// -------------------------------------------------------------------------
// Session state
// -------------------------------------------------------------------------

#[test]
fn test_default_session() {
    let session = CalculationSession::default();
    assert_eq!(session.reduction_target, 20.0);
    assert_eq!(session.horizon_years, 10);
    assert!(session.dirty, "a fresh session needs a first report");
    assert_eq!(session.start_year(), 2025);
}

#[test]
fn test_touch_bumps_revision() {
    let mut session = CalculationSession::default();
    session.dirty = false;
    session.touch();
    assert_eq!(session.revision, 1);
    assert!(session.dirty);
}

#[test]
fn test_replace_keeps_revision_monotonic() {
    let mut session = CalculationSession::default();
    session.touch();
    session.touch();
    let mut incoming = sample_session();
    incoming.revision = 0;
    session.replace_with(incoming);
    assert_eq!(session.revision, 3);
    assert_eq!(session.region, "AU");
}

#[test]
fn test_bytes_roundtrip_and_corrupt_fallback() {
    let session = sample_session();
    let restored = CalculationSession::from_bytes(&session.to_bytes());
    assert_eq!(restored, session);

    let garbage = CalculationSession::from_bytes(&[0xFF, 0x01, 0x02]);
    assert_eq!(garbage, CalculationSession::default());
}

// -------------------------------------------------------------------------
// recalculate()
// -------------------------------------------------------------------------

#[test]
fn test_recalculate_totals() {
    let policy = Policy::new();
    let report = recalculate(&sample_session(), policy.ctx());
    assert!((report.emissions.scope2 - 68_000.0).abs() < 1e-6);
    assert!((report.emissions.scope1 - 2_680.0).abs() < 1e-6);
    assert!(report.emissions.is_consistent());
    assert_eq!(report.breakdown[0].source_id, "electricity");
    assert_eq!(report.jurisdiction, "Australia");
    assert_eq!(report.timeline.len(), 10);
    assert_eq!(report.start_year, 2025);
}

#[test]
fn test_recalculate_with_extreme_years() {
    let policy = Policy::new();
    let mut session = sample_session();
    session.organization.reporting_year = Some(i32::MAX);
    session.horizon_years = crate::config::MAX_HORIZON_YEARS;
    session.strategies.push(ReductionStrategy::new(
        "late",
        StrategyFields::percentage("electricity", 10.0)
            .with_timeframe(Timeframe::Long)
            .with_year(i32::MAX),
    ));
    let report = recalculate(&session, policy.ctx());
    assert_eq!(report.start_year, crate::config::MAX_YEAR);
    assert_eq!(report.timeline.len(), crate::config::MAX_HORIZON_YEARS as usize);
}

#[test]
fn test_recalculate_is_idempotent() {
    let policy = Policy::new();
    let session = sample_session();
    assert_eq!(recalculate(&session, policy.ctx()), recalculate(&session, policy.ctx()));
}

#[test]
fn test_recalculate_applies_legislation_and_scores() {
    let policy = Policy::new();
    let report = recalculate(&sample_session(), policy.ctx());
    let ids: Vec<&str> = report.legislation.iter().map(|l| l.instrument_id.as_str()).collect();
    // 70,680 t and 600 staff: NGER and AASB S2, below the Safeguard threshold.
    assert_eq!(ids, vec!["au_nger", "au_aasb_s2"]);
    assert!(!report.offset.is_required);
    assert!(!report.disclaimer.is_empty());
}

#[test]
fn test_recalculate_rebaselines_percentage_strategies() {
    let policy = Policy::new();
    let mut session = sample_session();
    let mut strategy = ReductionStrategy::new(
        "efficiency",
        StrategyFields::percentage("energy", 10.0).with_timeframe(Timeframe::Short),
    );
    // Confirmed against a stale baseline.
    strategy.confirm(1.0);
    session.strategies.push(strategy);

    let report = recalculate(&session, policy.ctx());
    let expected = report.emissions.total * 0.1;
    assert!((report.timeline[0].reduction_this_year - expected).abs() < 1e-6);
    assert!((report.target.committed_reduction - expected).abs() < 1e-6);
}

#[test]
fn test_unknown_jurisdiction_degrades() {
    let policy = Policy::new();
    let mut session = sample_session();
    session.jurisdiction = "new_atlantis".to_string();
    let report = recalculate(&session, policy.ctx());
    assert_eq!(report.jurisdiction, "New Atlantis");
    assert!(report.legislation.is_empty());
    assert!(!report.offset.mandatory);
}

#[test]
fn test_baseline_total_matches_report() {
    let policy = Policy::new();
    let session = sample_session();
    let report = recalculate(&session, policy.ctx());
    assert_eq!(baseline_total(&session, &policy.catalog), report.emissions.total);
}

// -------------------------------------------------------------------------
// RecalcThrottle
// -------------------------------------------------------------------------

#[test]
fn test_zero_throttle_always_settled() {
    let mut throttle = RecalcThrottle::default();
    assert!(throttle.settled(1, Duration::ZERO));
    assert!(throttle.settled(2, Duration::from_millis(1)));
}

#[test]
fn test_throttle_waits_for_quiet_period() {
    let mut throttle = RecalcThrottle::new(Duration::from_millis(300));
    assert!(!throttle.settled(1, Duration::from_millis(1000)));
    assert!(!throttle.settled(1, Duration::from_millis(1200)));
    // Another edit restarts the wait.
    assert!(!throttle.settled(2, Duration::from_millis(1250)));
    assert!(!throttle.settled(2, Duration::from_millis(1500)));
    assert!(throttle.settled(2, Duration::from_millis(1550)));
}
