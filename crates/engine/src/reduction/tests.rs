use crate::reduction::*;

fn confirmed(id: &str, fields: StrategyFields, baseline: f64) -> ReductionStrategy {
    let mut s = ReductionStrategy::new(id, fields);
    s.confirm(baseline);
    s
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// -------------------------------------------------------------------------
// Strategy lifecycle
// -------------------------------------------------------------------------

#[test]
fn test_full_realization_year_follows_timeframe() {
    let short = ReductionStrategy::new("a", StrategyFields::percentage("energy", 10.0).with_year(2026));
    assert_eq!(short.full_realization_year(), 2026);

    let mut s = ReductionStrategy::new(
        "b",
        StrategyFields::percentage("energy", 10.0)
            .with_timeframe(Timeframe::Medium)
            .with_year(2026),
    );
    assert_eq!(s.full_realization_year(), 2028);

    s.set_timeframe(Timeframe::Long).unwrap();
    assert_eq!(s.full_realization_year(), 2030);

    s.set_implementation_year(2030).unwrap();
    assert_eq!(s.full_realization_year(), 2034);
}

#[test]
fn test_implementation_year_is_clamped() {
    let mut s = confirmed(
        "far",
        StrategyFields::percentage("energy", 10.0)
            .with_timeframe(Timeframe::Medium)
            .with_year(i32::MAX),
        1000.0,
    );
    assert_eq!(s.implementation_year(), crate::config::MAX_YEAR);
    assert_eq!(s.full_realization_year(), crate::config::MAX_YEAR + 2);
    assert_eq!(s.yearly_reductions().len(), 3);

    s.reopen();
    s.set_implementation_year(i32::MIN).unwrap();
    assert_eq!(s.implementation_year(), crate::config::MIN_YEAR);
}

#[test]
fn test_confirmed_strategy_is_locked() {
    let mut s = confirmed("solar", StrategyFields::percentage("energy", 10.0), 1000.0);
    let err = s.set_timeframe(Timeframe::Long).unwrap_err();
    assert_eq!(err.id, "solar");
    assert_eq!(s.timeframe(), Timeframe::Short);
    assert!(s.update(StrategyFields::absolute("fleet", 5.0)).is_err());
}

#[test]
fn test_reopen_clears_schedule_and_unlocks() {
    let mut s = confirmed("solar", StrategyFields::percentage("energy", 10.0), 1000.0);
    assert!(!s.yearly_reductions().is_empty());
    s.reopen();
    assert!(!s.is_confirmed());
    assert!(s.yearly_reductions().is_empty());
    assert!(s.set_timeframe(Timeframe::Medium).is_ok());
}

#[test]
fn test_restore_drops_schedule_of_drafts() {
    let mut stored = std::collections::BTreeMap::new();
    stored.insert(2025, 50.0);
    let draft = ReductionStrategy::restore("x", StrategyFields::default(), false, stored.clone());
    assert!(draft.yearly_reductions().is_empty());
    let kept = ReductionStrategy::restore("y", StrategyFields::default(), true, stored);
    assert_eq!(kept.yearly_reductions().get(&2025), Some(&50.0));
}

// -------------------------------------------------------------------------
// schedule()
// -------------------------------------------------------------------------

#[test]
fn test_medium_schedule_example() {
    let s = confirmed(
        "hvac",
        StrategyFields::percentage("efficiency", 30.0)
            .with_timeframe(Timeframe::Medium)
            .with_year(2025),
        1000.0,
    );
    let yearly = s.yearly_reductions();
    assert_eq!(yearly.len(), 3);
    assert!(approx(yearly[&2025], 90.0));
    assert!(approx(yearly[&2026], 150.0));
    assert!(approx(yearly[&2027], 60.0));
}

#[test]
fn test_short_schedule_realizes_everything_in_first_year() {
    let s = confirmed("led", StrategyFields::absolute("lighting", 42.0).with_year(2027), 1000.0);
    assert_eq!(s.yearly_reductions().len(), 1);
    assert!(approx(s.yearly_reductions()[&2027], 42.0));
}

#[test]
fn test_unconfirmed_strategy_has_empty_schedule() {
    let s = ReductionStrategy::new("draft", StrategyFields::percentage("energy", 50.0));
    assert!(schedule(&s, 1000.0).is_empty());
}

#[test]
fn test_schedule_conserves_total_reduction() {
    for timeframe in [Timeframe::Short, Timeframe::Medium, Timeframe::Long] {
        for fields in [
            StrategyFields::percentage("x", 37.5),
            StrategyFields::absolute("x", 123.4),
        ] {
            let s = confirmed("s", fields.with_timeframe(timeframe), 2345.6);
            let sum: f64 = s.yearly_reductions().values().sum();
            assert!(
                (sum - total_reduction(&s, 2345.6)).abs() < 1e-6,
                "{:?}: {} != {}",
                timeframe,
                sum,
                total_reduction(&s, 2345.6)
            );
        }
    }
}

#[test]
fn test_potential_and_tonnes_are_clamped() {
    let over = confirmed("over", StrategyFields::percentage("x", 150.0), 1000.0);
    assert!(approx(total_reduction(&over, 1000.0), 1000.0));

    let under = confirmed("under", StrategyFields::percentage("x", -10.0), 1000.0);
    assert_eq!(total_reduction(&under, 1000.0), 0.0);

    let negative = confirmed("neg", StrategyFields::absolute("x", -5.0), 1000.0);
    assert_eq!(total_reduction(&negative, 1000.0), 0.0);
}

#[test]
fn test_strategy_without_values_counts_zero() {
    let fields = StrategyFields {
        category: "vague".to_string(),
        ..Default::default()
    };
    let s = confirmed("vague", fields, 1000.0);
    assert_eq!(total_reduction(&s, 1000.0), 0.0);
    assert!(s.yearly_reductions().values().all(|t| *t == 0.0));
}

// -------------------------------------------------------------------------
// project_timeline()
// -------------------------------------------------------------------------

#[test]
fn test_timeline_baseline_only() {
    let points = project_timeline(1000.0, &[], 0.0, 20.0, 2025, 10);
    assert_eq!(points.len(), 10);
    assert_eq!(points[0].year, 2025);
    assert_eq!(points[9].year, 2034);
    for p in &points {
        assert_eq!(p.projected_emissions, 1000.0);
        assert!(approx(p.target_emissions, 800.0));
    }
}

#[test]
fn test_timeline_accumulates_reductions() {
    let s = confirmed(
        "hvac",
        StrategyFields::percentage("efficiency", 30.0)
            .with_timeframe(Timeframe::Medium)
            .with_year(2025),
        1000.0,
    );
    let points = project_timeline(1000.0, &[s], 0.0, 20.0, 2025, 5);
    assert!(approx(points[0].projected_emissions, 910.0));
    assert!(approx(points[1].projected_emissions, 760.0));
    assert!(approx(points[2].projected_emissions, 700.0));
    assert!(approx(points[4].projected_emissions, 700.0));
    assert_eq!(first_year_meeting_target(&points), Some(2026));
}

#[test]
fn test_credits_apply_only_in_first_year() {
    let points = project_timeline(1000.0, &[], 100.0, 0.0, 2025, 3);
    assert!(approx(points[0].projected_emissions, 900.0));
    assert_eq!(points[0].credits_applied, 100.0);
    assert_eq!(points[1].credits_applied, 0.0);
    assert!(approx(points[1].projected_emissions, 1000.0));
}

#[test]
fn test_projection_never_negative() {
    let s = confirmed("big", StrategyFields::absolute("x", 5000.0), 1000.0);
    let points = project_timeline(1000.0, &[s], 10_000.0, 20.0, 2025, 3);
    assert!(points.iter().all(|p| p.projected_emissions == 0.0));
}

#[test]
fn test_unconfirmed_strategies_contribute_nothing() {
    let mut stale = confirmed("stale", StrategyFields::percentage("x", 50.0), 1000.0);
    stale.reopen();
    let draft = ReductionStrategy::new("draft", StrategyFields::absolute("x", 300.0));
    let with = project_timeline(1000.0, &[stale, draft], 0.0, 20.0, 2025, 10);
    let without = project_timeline(1000.0, &[], 0.0, 20.0, 2025, 10);
    assert_eq!(with, without);
}

#[test]
fn test_reductions_before_start_year_are_ignored() {
    let s = confirmed("early", StrategyFields::absolute("x", 100.0).with_year(2020), 1000.0);
    let points = project_timeline(1000.0, &[s], 0.0, 20.0, 2025, 5);
    assert!(points.iter().all(|p| p.cumulative_reduction == 0.0));
}

#[test]
fn test_projection_non_increasing_over_time() {
    let strategies = vec![
        confirmed("a", StrategyFields::percentage("x", 10.0).with_timeframe(Timeframe::Long), 1000.0),
        confirmed("b", StrategyFields::absolute("x", 75.0).with_year(2027), 1000.0),
    ];
    let points = project_timeline(1000.0, &strategies, 0.0, 20.0, 2025, 10);
    for pair in points.windows(2) {
        assert!(pair[1].projected_emissions <= pair[0].projected_emissions);
    }
}

#[test]
fn test_horizon_capped() {
    let points = project_timeline(1.0, &[], 0.0, 0.0, 2025, 10_000);
    assert_eq!(points.len(), crate::config::MAX_HORIZON_YEARS as usize);
}

#[test]
fn test_timeline_stops_at_last_representable_year() {
    let timeline = project_timeline(1000.0, &[], 0.0, 20.0, i32::MAX - 3, 10);
    assert_eq!(timeline.len(), 4);
    assert_eq!(timeline.last().unwrap().year, i32::MAX);
}

#[test]
fn test_target_never_met_returns_none() {
    let points = project_timeline(1000.0, &[], 0.0, 20.0, 2025, 10);
    assert_eq!(first_year_meeting_target(&points), None);
}

// -------------------------------------------------------------------------
// Summaries
// -------------------------------------------------------------------------

#[test]
fn test_target_summary_example() {
    let summary = TargetSummary::compute(1000.0, 20.0, &[]);
    assert!(approx(summary.target_emissions, 800.0));
    assert!(approx(summary.required_reduction, 200.0));
    assert!(approx(summary.remaining_gap, 200.0));
    assert!(!summary.on_track);
}

#[test]
fn test_target_summary_on_track_with_committed_strategy() {
    let s = confirmed("s", StrategyFields::percentage("x", 20.0), 1000.0);
    let summary = TargetSummary::compute(1000.0, 20.0, &[s]);
    assert!(approx(summary.committed_reduction, 200.0));
    assert!(summary.on_track);
}

#[test]
fn test_cost_summary_groups_confirmed_only() {
    let strategies = vec![
        confirmed("a", StrategyFields::absolute("x", 10.0).with_cost(CostTier::Low), 1000.0),
        confirmed("b", StrategyFields::absolute("x", 20.0).with_cost(CostTier::Low), 1000.0),
        confirmed("c", StrategyFields::percentage("x", 5.0).with_cost(CostTier::High), 1000.0),
        ReductionStrategy::new("d", StrategyFields::absolute("x", 99.0).with_cost(CostTier::Medium)),
    ];
    let summary = StrategyCostSummary::compute(&strategies, 1000.0);
    assert_eq!(summary.low.strategies, 2);
    assert!(approx(summary.low.tonnes, 30.0));
    assert_eq!(summary.medium.strategies, 0);
    assert!(approx(summary.tier(CostTier::High).tonnes, 50.0));
    assert_eq!(summary.total_strategies(), 3);
}
