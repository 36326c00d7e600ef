//! Scenario persistence: the versioned snapshot schema, the migration chain,
//! the on-disk codec and named stores.

mod atomic_write;
pub mod file_header;
pub mod scenario_codec;
pub mod scenario_error;
pub mod scenario_migrate;
mod scenario_migrate_registry;
pub mod scenario_plugin;
pub mod scenario_types;
pub mod serialization;
pub mod store;


pub use scenario_error::ScenarioError;
pub use scenario_plugin::{
    ActiveScenarioStore, LastPersistenceOutcome, LoadScenarioEvent, PersistenceAction,
    PersistenceOutcomeEvent, SaveScenarioEvent, ScenarioPlugin,
};
pub use scenario_types::{ScenarioSnapshot, CURRENT_SCENARIO_VERSION};
pub use serialization::{deserialize, deserialize_str, parse_snapshot, serialize};
pub use store::{
    load_scenario, save_scenario, FileScenarioStore, MemoryScenarioStore, PersistenceOutcome,
    ScenarioStore,
};
