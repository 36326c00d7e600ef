//! Undo/redo for the calculation session.
//!
//! Every executed batch of edits records one bitcode snapshot of the session
//! as it was before the batch, so a batch is one undo step. Reset and scenario
//! loads record a snapshot too. Undo and redo swap snapshots through
//! [`CalculationSession::replace_with`], so the revision keeps counting up and
//! a fresh report always follows.

use bevy::prelude::*;

use crate::session::CalculationSession;
use crate::EngineSet;

/// Undo steps kept before the oldest is dropped.
pub const MAX_HISTORY: usize = 100;

/// Undo and redo stacks of encoded sessions.
#[derive(Resource, Debug, Default)]
pub struct SessionHistory {
    undo_stack: Vec<Vec<u8>>,
    redo_stack: Vec<Vec<u8>>,
}

fn push_capped(stack: &mut Vec<Vec<u8>>, snapshot: Vec<u8>) {
    stack.push(snapshot);
    if stack.len() > MAX_HISTORY {
        stack.remove(0);
    }
}

impl SessionHistory {
    /// Record the state before a change. Clears the redo stack.
    pub fn record(&mut self, before: &CalculationSession) {
        self.redo_stack.clear();
        push_capped(&mut self.undo_stack, before.to_bytes());
    }

    /// Restore the previous state. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, session: &mut CalculationSession) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(session.to_bytes());
        session.replace_with(CalculationSession::from_bytes(&snapshot));
        true
    }

    /// Re-apply the last undone state. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, session: &mut CalculationSession) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        push_capped(&mut self.undo_stack, session.to_bytes());
        session.replace_with(CalculationSession::from_bytes(&snapshot));
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRequest {
    Undo,
    Redo,
}

/// Whether the most recent [`HistoryRequest`] changed the session.
#[derive(Resource, Debug, Default)]
pub struct LastHistoryOutcome(pub Option<bool>);

pub fn process_history_requests(
    mut requests: EventReader<HistoryRequest>,
    mut history: ResMut<SessionHistory>,
    mut session: ResMut<CalculationSession>,
    mut outcome: ResMut<LastHistoryOutcome>,
) {
    for request in requests.read() {
        let applied = match request {
            HistoryRequest::Undo => history.undo(&mut session),
            HistoryRequest::Redo => history.redo(&mut session),
        };
        if !applied {
            debug!("{:?} requested with an empty stack", request);
        }
        outcome.0 = Some(applied);
    }
}

pub struct SessionHistoryPlugin;

impl Plugin for SessionHistoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionHistory>()
            .init_resource::<LastHistoryOutcome>()
            .add_event::<HistoryRequest>()
            .add_systems(
                Update,
                process_history_requests
                    .after(crate::session_edits::execute_queued_edits)
                    .in_set(EngineSet::Input),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_target(target: f64) -> CalculationSession {
        CalculationSession {
            reduction_target: target,
            ..Default::default()
        }
    }

    #[test]
    fn undo_then_redo_swaps_snapshots() {
        let mut history = SessionHistory::default();
        let mut session = with_target(20.0);
        history.record(&session);
        session.reduction_target = 45.0;
        session.touch();

        assert!(history.undo(&mut session));
        assert_eq!(session.reduction_target, 20.0);
        assert_eq!(session.revision, 2, "revision never goes backwards");
        assert!(session.dirty);

        assert!(history.redo(&mut session));
        assert_eq!(session.reduction_target, 45.0);
        assert_eq!(session.revision, 3);
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn empty_stacks_leave_session_alone() {
        let mut history = SessionHistory::default();
        let mut session = with_target(30.0);
        assert!(!history.undo(&mut session));
        assert!(!history.redo(&mut session));
        assert_eq!(session, with_target(30.0));
    }

    #[test]
    fn new_record_clears_redo() {
        let mut history = SessionHistory::default();
        let mut session = with_target(10.0);
        history.record(&session);
        history.undo(&mut session);
        assert!(history.can_redo());
        history.record(&session);
        assert!(!history.can_redo());
    }

    #[test]
    fn history_is_capped() {
        let mut history = SessionHistory::default();
        let mut session = with_target(0.0);
        for step in 0..(MAX_HISTORY + 5) {
            history.record(&with_target(step as f64 / 10.0));
        }
        let mut undone = 0;
        while history.undo(&mut session) {
            undone += 1;
        }
        assert_eq!(undone, MAX_HISTORY);
        assert_eq!(session.reduction_target, 0.5);
    }
}
