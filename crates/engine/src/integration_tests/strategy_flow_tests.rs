//! Strategies, credits and target tracking end to end.

use crate::credits::CreditProject;
use crate::reduction::{StrategyFields, Timeframe};
use crate::session_edits::{EditError, EditResult, SessionEdit};
use crate::test_harness::TestSession;

fn baseline_1000() -> TestSession {
    // 1,000 t of process emissions entered directly in kg CO2e.
    TestSession::new().with_activity("process_emissions", 1_000_000.0)
}

#[test]
fn test_confirmed_strategy_reaches_target() {
    let mut session = baseline_1000();
    session.edit(SessionEdit::AddStrategy {
        id: "efficiency".to_string(),
        fields: StrategyFields::absolute("process_emissions", 200.0).with_year(2025),
    });
    // Drafts do not move the projection.
    assert_eq!(session.report().timeline[0].projected_emissions, 1_000.0);

    session.edit(SessionEdit::ConfirmStrategy {
        id: "efficiency".to_string(),
    });
    let report = session.report();
    assert!((report.timeline[0].projected_emissions - 800.0).abs() < 1e-9);
    assert!((report.timeline[0].target_emissions - 800.0).abs() < 1e-9);
    assert_eq!(report.first_year_meeting_target, Some(2025));
    assert!(report.target.on_track);
}

#[test]
fn test_percentage_strategy_follows_baseline_changes() {
    let mut session = baseline_1000();
    session.edit(SessionEdit::AddStrategy {
        id: "cut".to_string(),
        fields: StrategyFields::percentage("process_emissions", 10.0)
            .with_timeframe(Timeframe::Medium)
            .with_year(2025),
    });
    session.edit(SessionEdit::ConfirmStrategy {
        id: "cut".to_string(),
    });
    // 10% of 1,000 t over 30/50/20.
    assert!((session.report().timeline[0].reduction_this_year - 30.0).abs() < 1e-9);

    session.edit(SessionEdit::SetActivity {
        id: "process_emissions".to_string(),
        value: crate::session_edits::RawValue::Number(2_000_000.0),
    });
    assert!((session.report().timeline[0].reduction_this_year - 60.0).abs() < 1e-9);
    assert!((session.report().timeline[2].cumulative_reduction - 200.0).abs() < 1e-9);
}

#[test]
fn test_locked_strategy_edit_is_rejected() {
    let mut session = baseline_1000();
    session.edit(SessionEdit::AddStrategy {
        id: "a".to_string(),
        fields: StrategyFields::percentage("process_emissions", 5.0),
    });
    session.edit(SessionEdit::ConfirmStrategy { id: "a".to_string() });
    let result = session.edit(SessionEdit::UpdateStrategy {
        id: "a".to_string(),
        fields: StrategyFields::percentage("process_emissions", 50.0),
    });
    assert_eq!(
        result,
        EditResult::Error(EditError::StrategyLocked("a".to_string()))
    );
}

#[test]
fn test_credits_lower_first_year_only() {
    let mut session = baseline_1000();
    session.edit(SessionEdit::AddCreditProject {
        project: CreditProject {
            id: "forest".to_string(),
            name: "Forest Regeneration".to_string(),
            credit_type: "ACCU".to_string(),
            available_credits: 500,
            price_per_tonne: Some(30.0),
        },
    });
    session.edit(SessionEdit::SelectCredits {
        project_id: "forest".to_string(),
        quantity: 150,
    });

    let report = session.report();
    assert_eq!(report.credits.total_tonnes, 150.0);
    assert_eq!(report.credits.total_spend, 4_500.0);
    assert_eq!(report.timeline[0].projected_emissions, 850.0);
    assert_eq!(report.timeline[1].projected_emissions, 1_000.0);
}
