use bevy::prelude::*;

use engine::factors::FactorCatalog;
use engine::session::CalculationSession;
use engine::session_edits::execute_queued_edits;
use engine::session_history::SessionHistory;
use engine::EngineSet;

use crate::store::{load_scenario, save_scenario, MemoryScenarioStore, PersistenceOutcome, ScenarioStore};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// The store save/load events go through. Defaults to an in-memory store;
/// binaries insert a `FileScenarioStore` before adding the plugin.
#[derive(Resource)]
pub struct ActiveScenarioStore(pub Box<dyn ScenarioStore>);

impl Default for ActiveScenarioStore {
    fn default() -> Self {
        Self(Box::new(MemoryScenarioStore::new()))
    }
}

impl ActiveScenarioStore {
    pub fn new(store: impl ScenarioStore) -> Self {
        Self(Box::new(store))
    }
}

/// The most recent outcome, for callers that poll instead of reading events.
#[derive(Resource, Debug, Clone, Default)]
pub struct LastPersistenceOutcome(pub Option<PersistenceOutcomeEvent>);

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Event, Debug, Clone)]
pub struct SaveScenarioEvent {
    pub name: String,
}

#[derive(Event, Debug, Clone)]
pub struct LoadScenarioEvent {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceAction {
    Save,
    Load,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct PersistenceOutcomeEvent {
    pub action: PersistenceAction,
    pub name: String,
    pub outcome: PersistenceOutcome,
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Handles scenario save/load requests in the input phase, so a loaded
/// session is recalculated in the same update.
pub struct ScenarioPlugin;

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SaveScenarioEvent>()
            .add_event::<LoadScenarioEvent>()
            .add_event::<PersistenceOutcomeEvent>()
            .init_resource::<ActiveScenarioStore>()
            .init_resource::<LastPersistenceOutcome>();

        app.add_systems(
            Update,
            (handle_save_events, handle_load_events)
                .chain()
                .after(execute_queued_edits)
                .in_set(EngineSet::Input),
        );
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn handle_save_events(
    mut requests: EventReader<SaveScenarioEvent>,
    mut store: ResMut<ActiveScenarioStore>,
    session: Res<CalculationSession>,
    catalog: Res<FactorCatalog>,
    mut outcomes: EventWriter<PersistenceOutcomeEvent>,
    mut last: ResMut<LastPersistenceOutcome>,
) {
    for request in requests.read() {
        let outcome = save_scenario(store.0.as_mut(), &request.name, &session, &catalog);
        let event = PersistenceOutcomeEvent {
            action: PersistenceAction::Save,
            name: request.name.clone(),
            outcome,
        };
        last.0 = Some(event.clone());
        outcomes.send(event);
    }
}

fn handle_load_events(
    mut requests: EventReader<LoadScenarioEvent>,
    store: Res<ActiveScenarioStore>,
    mut session: ResMut<CalculationSession>,
    mut history: ResMut<SessionHistory>,
    mut outcomes: EventWriter<PersistenceOutcomeEvent>,
    mut last: ResMut<LastPersistenceOutcome>,
) {
    for request in requests.read() {
        // Only a successful load touches the session; a failed one must not
        // trigger change detection either.
        let mut staged = session.clone();
        let outcome = load_scenario(store.0.as_ref(), &request.name, &mut staged);
        if outcome.success {
            history.record(&session);
            *session = staged;
        }
        let event = PersistenceOutcomeEvent {
            action: PersistenceAction::Load,
            name: request.name.clone(),
            outcome,
        };
        last.0 = Some(event.clone());
        outcomes.send(event);
    }
}
