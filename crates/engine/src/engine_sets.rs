//! Ordering of engine systems within the `Update` schedule.
//!
//! ```text
//! Input  →  Recalculate  →  Report
//! ```
//!
//! * **Input** – Drain queued edits and catalog fetches into the session.
//! * **Recalculate** – Turn a dirty session into a fresh `LatestReport`.
//! * **Report** – Read-only consumers of the new report (invariant checks,
//!   agent responses, scenario autosave).

use bevy::prelude::*;

/// Ordered phases for engine systems, configured as a chain.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EngineSet {
    Input,
    Recalculate,
    Report,
}

pub struct EngineSetsPlugin;

impl Plugin for EngineSetsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (EngineSet::Input, EngineSet::Recalculate, EngineSet::Report).chain(),
        );
    }
}
