// ---------------------------------------------------------------------------
// store – named scenario storage and the save/load entry points
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use engine::factors::FactorCatalog;
use engine::session::CalculationSession;

use crate::atomic_write::atomic_write;
use crate::scenario_codec::{decode_scenario, encode_scenario};
use crate::scenario_error::ScenarioError;
use crate::serialization::serialize;

/// File extension of scenario files written by [`FileScenarioStore`].
pub const SCENARIO_EXTENSION: &str = "cpln";

/// Where encoded scenario files live. Stores deal in bytes; encoding and
/// migration happen above them.
pub trait ScenarioStore: Send + Sync + 'static {
    fn save(&mut self, name: &str, bytes: &[u8]) -> Result<(), ScenarioError>;
    fn load(&self, name: &str) -> Result<Vec<u8>, ScenarioError>;
    /// Stored scenario names, sorted.
    fn list(&self) -> Result<Vec<String>, ScenarioError>;
}

/// Names become file names, so path separators and empty names are refused.
pub fn validate_name(name: &str) -> Result<&str, ScenarioError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.starts_with('.')
        || trimmed.contains(['/', '\\', '\0'])
    {
        return Err(ScenarioError::Malformed(format!(
            "invalid scenario name '{name}'"
        )));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// One `{name}.cpln` file per scenario under `dir`.
#[derive(Debug, Clone)]
pub struct FileScenarioStore {
    dir: PathBuf,
}

impl FileScenarioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ScenarioError> {
        let name = validate_name(name)?;
        Ok(self.dir.join(format!("{name}.{SCENARIO_EXTENSION}")))
    }
}

impl ScenarioStore for FileScenarioStore {
    fn save(&mut self, name: &str, bytes: &[u8]) -> Result<(), ScenarioError> {
        let path = self.path_for(name)?;
        atomic_write(&path, bytes)?;
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Vec<u8>, ScenarioError> {
        let path = self.path_for(name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ScenarioError::NotFound(name.to_string()),
            _ => ScenarioError::Io(e),
        })
    }

    fn list(&self) -> Result<Vec<String>, ScenarioError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SCENARIO_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryScenarioStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStore for MemoryScenarioStore {
    fn save(&mut self, name: &str, bytes: &[u8]) -> Result<(), ScenarioError> {
        let name = validate_name(name)?;
        self.entries.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Vec<u8>, ScenarioError> {
        let name = validate_name(name)?;
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| ScenarioError::NotFound(name.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, ScenarioError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

/// Result handed back to the presentation layer. Failures never panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PersistenceOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<(), ScenarioError>> for PersistenceOutcome {
    fn from(result: Result<(), ScenarioError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::failed(e),
        }
    }
}

/// Serialize `session` and store it under `name`.
pub fn save_scenario(
    store: &mut dyn ScenarioStore,
    name: &str,
    session: &CalculationSession,
    catalog: &FactorCatalog,
) -> PersistenceOutcome {
    let result = encode_scenario(&serialize(session, catalog))
        .and_then(|bytes| store.save(name, &bytes));
    match &result {
        Ok(()) => info!("Saved scenario '{}' (revision {})", name, session.revision),
        Err(e) => warn!("Failed to save scenario '{}': {}", name, e),
    }
    result.into()
}

/// Replace `session` with the scenario stored under `name`. On any failure the
/// session is left exactly as it was.
pub fn load_scenario(
    store: &dyn ScenarioStore,
    name: &str,
    session: &mut CalculationSession,
) -> PersistenceOutcome {
    let loaded = store
        .load(name)
        .and_then(|bytes| decode_scenario(&bytes))
        .map(|snapshot| snapshot.into_session());
    match loaded {
        Ok(loaded) => {
            session.replace_with(loaded);
            info!("Loaded scenario '{}' as revision {}", name, session.revision);
            PersistenceOutcome::ok()
        }
        Err(e) => {
            warn!("Failed to load scenario '{}': {}", name, e);
            PersistenceOutcome::failed(e)
        }
    }
}
