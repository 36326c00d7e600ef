use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::SessionEdit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditSource {
    User,
    Agent,
    Scenario,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedEdit {
    pub source: EditSource,
    pub edit: SessionEdit,
}

/// Pending edits, applied in order by `execute_queued_edits`.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct EditQueue {
    pending: Vec<QueuedEdit>,
}

impl EditQueue {
    pub fn push(&mut self, source: EditSource, edit: SessionEdit) {
        self.pending.push(QueuedEdit { source, edit });
    }

    pub fn push_queued(&mut self, queued: QueuedEdit) {
        self.pending.push(queued);
    }

    pub fn drain(&mut self) -> Vec<QueuedEdit> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_preserves_fifo() {
        let mut queue = EditQueue::default();
        queue.push(
            EditSource::User,
            SessionEdit::SetRegion {
                region: "AU".to_string(),
            },
        );
        queue.push(EditSource::Agent, SessionEdit::SetHorizon { years: 5 });
        queue.push(EditSource::Scenario, SessionEdit::ClearAllActivities);

        assert_eq!(queue.len(), 3);
        let drained = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(drained[0].source, EditSource::User);
        assert_eq!(drained[1].edit, SessionEdit::SetHorizon { years: 5 });
        assert_eq!(drained[2].edit, SessionEdit::ClearAllActivities);
    }
}
