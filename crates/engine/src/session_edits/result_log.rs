//! Bounded log of applied session edits.
//!
//! Every executed edit gets a sequence number, so a caller that queued a batch
//! can collect exactly its own results with [`EditResultLog::since`] instead
//! of diffing the session. Each entry also records the session revision the
//! edit left behind.

use bevy::prelude::*;

use super::{EditResult, EditSource, SessionEdit};

/// Entries kept before the oldest is evicted. Larger batches cannot be
/// reported back in full.
pub const MAX_LOGGED_EDITS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedEdit {
    pub sequence: u64,
    pub source: EditSource,
    pub edit: SessionEdit,
    pub result: EditResult,
    /// Session revision after the edit; unchanged for rejected edits.
    pub revision: u64,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct EditResultLog {
    entries: Vec<LoggedEdit>,
    next_sequence: u64,
}

impl EditResultLog {
    /// Record an executed edit, evicting the oldest entry when full. Returns
    /// the sequence number assigned to it.
    pub fn push(
        &mut self,
        source: EditSource,
        edit: SessionEdit,
        result: EditResult,
        revision: u64,
    ) -> u64 {
        if self.entries.len() >= MAX_LOGGED_EDITS {
            self.entries.remove(0);
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(LoggedEdit {
            sequence,
            source,
            edit,
            result,
            revision,
        });
        sequence
    }

    /// Sequence number the next recorded edit will get.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Entries recorded at or after `sequence`, oldest first. `None` when some
    /// of them were already evicted.
    pub fn since(&self, sequence: u64) -> Option<&[LoggedEdit]> {
        let oldest = self.entries.first().map_or(self.next_sequence, |e| e.sequence);
        if sequence < oldest {
            return None;
        }
        let skip = (sequence - oldest) as usize;
        Some(&self.entries[skip.min(self.entries.len())..])
    }

    pub fn last(&self) -> Option<&LoggedEdit> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
