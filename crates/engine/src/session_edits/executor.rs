use bevy::prelude::*;

use crate::config::{clamp_year, MAX_HORIZON_YEARS};
use crate::credits::{add_selection, remove_selection};
use crate::factors::FactorCatalog;
use crate::legislation::{is_known_jurisdiction, known_jurisdictions};
use crate::reduction::ReductionStrategy;
use crate::session::{baseline_total, CalculationSession};
use crate::session_history::SessionHistory;
use crate::sources::find_source;

use super::result_log::EditResultLog;
use super::{EditError, EditQueue, EditResult, RawValue, SessionEdit};

/// Drain the queue, apply each edit in order (last write wins) and record the
/// outcome. Each accepted edit bumps the session revision; a drained batch
/// with at least one accepted edit is one undo step.
pub fn execute_queued_edits(
    mut queue: ResMut<EditQueue>,
    mut session: ResMut<CalculationSession>,
    catalog: Res<FactorCatalog>,
    mut log: ResMut<EditResultLog>,
    mut history: ResMut<SessionHistory>,
) {
    if queue.is_empty() {
        return;
    }
    let before = session.clone();
    for queued in queue.drain() {
        let result = apply_edit(&mut session, &catalog, &queued.edit);
        match &result {
            EditResult::Error(e) => warn!("Edit from {:?} rejected: {}", queued.source, e),
            EditResult::SuccessWithWarning(w) => debug!("Edit applied with warning: {}", w),
            EditResult::Success => {}
        }
        if result.is_success() {
            session.touch();
        }
        log.push(queued.source, queued.edit, result, session.revision);
    }
    if session.revision != before.revision {
        history.record(&before);
    }
}

/// Apply one edit to `session`. Does not touch the revision; the caller does
/// that for accepted edits.
pub fn apply_edit(
    session: &mut CalculationSession,
    catalog: &FactorCatalog,
    edit: &SessionEdit,
) -> EditResult {
    match edit {
        SessionEdit::SetActivity { id, value } => {
            let raw = value.as_raw();
            session.inputs.set_raw(id.clone(), raw.clone());
            if find_source(id).is_none() {
                EditResult::SuccessWithWarning(format!(
                    "unknown source '{id}' is stored but not counted"
                ))
            } else if was_coerced(value) {
                EditResult::SuccessWithWarning(format!(
                    "value '{raw}' for '{id}' is not a non-negative number; counted as 0"
                ))
            } else {
                EditResult::Success
            }
        }
        SessionEdit::ClearActivity { id } => {
            session.inputs.set_raw(id.clone(), "");
            EditResult::Success
        }
        SessionEdit::ClearAllActivities => {
            session.inputs.clear();
            EditResult::Success
        }
        SessionEdit::SetRegion { region } => {
            session.region = region.trim().to_uppercase();
            EditResult::Success
        }
        SessionEdit::SetJurisdiction { jurisdiction } => {
            session.jurisdiction = jurisdiction.clone();
            if is_known_jurisdiction(jurisdiction) {
                EditResult::Success
            } else {
                EditResult::SuccessWithWarning(format!(
                    "unknown jurisdiction '{jurisdiction}' has no legislation; known: {}",
                    known_jurisdictions().join(", ")
                ))
            }
        }
        SessionEdit::UpdateOrganization { organization } => {
            session.organization = organization.clone();
            match session.organization.clamp_reporting_year() {
                Some(year) => EditResult::SuccessWithWarning(format!(
                    "reporting year {year} clamped to {}",
                    session.organization.start_year()
                )),
                None => EditResult::Success,
            }
        }
        SessionEdit::SetReductionTarget { percent } => {
            let clamped = if percent.is_nan() {
                0.0
            } else {
                percent.clamp(0.0, 100.0)
            };
            session.reduction_target = clamped;
            if clamped != *percent {
                EditResult::SuccessWithWarning(format!(
                    "reduction target {percent} clamped to {clamped}"
                ))
            } else {
                EditResult::Success
            }
        }
        SessionEdit::SetHorizon { years } => {
            let clamped = (*years).clamp(1, MAX_HORIZON_YEARS);
            session.horizon_years = clamped;
            if clamped != *years {
                EditResult::SuccessWithWarning(format!("horizon {years} clamped to {clamped}"))
            } else {
                EditResult::Success
            }
        }
        SessionEdit::SetActiveSection { section } => {
            session.active_section = section.clone();
            EditResult::Success
        }
        SessionEdit::AddStrategy { id, fields } => {
            if session.strategy(id).is_some() {
                return EditResult::Error(EditError::DuplicateStrategy(id.clone()));
            }
            session
                .strategies
                .push(ReductionStrategy::new(id.clone(), fields.clone()));
            year_warning(fields.implementation_year)
        }
        SessionEdit::UpdateStrategy { id, fields } => match session.strategy_mut(id) {
            Some(strategy) => match strategy.update(fields.clone()) {
                Ok(()) => year_warning(fields.implementation_year),
                Err(e) => EditResult::Error(e.into()),
            },
            None => EditResult::Error(EditError::UnknownStrategy(id.clone())),
        },
        SessionEdit::RemoveStrategy { id } => {
            let before = session.strategies.len();
            session.strategies.retain(|s| s.id() != id);
            if session.strategies.len() == before {
                EditResult::Error(EditError::UnknownStrategy(id.clone()))
            } else {
                EditResult::Success
            }
        }
        SessionEdit::ConfirmStrategy { id } => {
            let baseline = baseline_total(session, catalog);
            match session.strategy_mut(id) {
                Some(strategy) => {
                    let was_confirmed = strategy.is_confirmed();
                    strategy.confirm(baseline);
                    if was_confirmed {
                        EditResult::SuccessWithWarning(format!(
                            "strategy '{id}' was already confirmed; schedule refreshed"
                        ))
                    } else {
                        EditResult::Success
                    }
                }
                None => EditResult::Error(EditError::UnknownStrategy(id.clone())),
            }
        }
        SessionEdit::ReopenStrategy { id } => match session.strategy_mut(id) {
            Some(strategy) => {
                strategy.reopen();
                EditResult::Success
            }
            None => EditResult::Error(EditError::UnknownStrategy(id.clone())),
        },
        SessionEdit::AddCreditProject { project } => upsert_project(session, project.clone()),
        SessionEdit::SelectCredits {
            project_id,
            quantity,
        } => add_selection(
            &mut session.credit_selections,
            &session.credit_projects,
            project_id,
            *quantity,
        )
        .map_err(EditError::from)
        .into(),
        SessionEdit::RemoveCredits { project_id } => {
            if remove_selection(&mut session.credit_selections, project_id) {
                EditResult::Success
            } else {
                EditResult::Error(EditError::UnknownCreditProject(project_id.clone()))
            }
        }
    }
}

/// Warn when an implementation year had to be clamped.
fn year_warning(year: i32) -> EditResult {
    let clamped = clamp_year(year);
    if clamped == year {
        EditResult::Success
    } else {
        EditResult::SuccessWithWarning(format!(
            "implementation year {year} clamped to {clamped}"
        ))
    }
}

/// Whether the stored quantity differs from what was typed.
fn was_coerced(value: &RawValue) -> bool {
    match value {
        RawValue::Number(n) => value.quantity() != *n,
        RawValue::Text(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
            if cleaned.is_empty() {
                return false;
            }
            match cleaned.parse::<f64>() {
                Ok(n) => value.quantity() != n,
                Err(_) => true,
            }
        }
    }
}

/// Insert or replace a project. Existing selections are trimmed to the new
/// supply.
fn upsert_project(
    session: &mut CalculationSession,
    project: crate::credits::CreditProject,
) -> EditResult {
    let available = project.available_credits;
    let id = project.id.clone();
    match session.credit_projects.iter_mut().find(|p| p.id == id) {
        Some(slot) => *slot = project,
        None => session.credit_projects.push(project),
    }

    let Some(selection) = session
        .credit_selections
        .iter_mut()
        .find(|s| s.project_id == id)
    else {
        return EditResult::Success;
    };
    if selection.selected_quantity <= available {
        return EditResult::Success;
    }
    if available == 0 {
        remove_selection(&mut session.credit_selections, &id);
        return EditResult::SuccessWithWarning(format!(
            "project '{id}' has no credits left; selection removed"
        ));
    }
    let previous = selection.selected_quantity;
    selection.selected_quantity = available;
    EditResult::SuccessWithWarning(format!(
        "selection for '{id}' reduced from {previous} to {available}"
    ))
}
