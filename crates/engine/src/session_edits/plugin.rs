//! Plugin that wires up session edits: queue, executor and result log.

use bevy::prelude::*;

use super::executor::execute_queued_edits;
use super::result_log::EditResultLog;
use super::EditQueue;
use crate::EngineSet;

/// Registers the edit queue, result log and executor system.
pub struct SessionEditsPlugin;

impl Plugin for SessionEditsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditQueue>();
        app.init_resource::<EditResultLog>();

        app.add_systems(Update, execute_queued_edits.in_set(EngineSet::Input));
    }
}
