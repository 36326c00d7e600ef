// ---------------------------------------------------------------------------
// Scenario migration steps
// ---------------------------------------------------------------------------
//
// Concrete upgrade steps plus `migrate_snapshot()`, used by `deserialize`.
// New fields only ever need `#[serde(default)]`; a step exists when old data
// has to be renamed or repaired.

use serde_json::{Map, Value};

use crate::scenario_error::ScenarioError;
pub use crate::scenario_migrate_registry::MigrationReport;
use crate::scenario_migrate_registry::{MigrationRegistry, MigrationStep};
use crate::scenario_types::CURRENT_SCENARIO_VERSION;

pub(crate) fn build_migration_registry() -> MigrationRegistry {
    let steps = vec![
        MigrationStep {
            from_version: 0,
            description: "Rename legacy inputs/strategies keys",
            migrate_fn: rename_legacy_keys,
        },
        MigrationStep {
            from_version: 1,
            description: "Fill reductionType on strategies",
            migrate_fn: fill_reduction_type,
        },
        MigrationStep {
            from_version: 2,
            description: "Recompute emissions.total from scopes",
            migrate_fn: recompute_emissions_total,
        },
    ];
    MigrationRegistry::new(steps, CURRENT_SCENARIO_VERSION)
}

/// Version stored in the payload. Missing or unreadable means v0.
pub fn snapshot_version(snapshot: &Map<String, Value>) -> u32 {
    snapshot
        .get("version")
        .and_then(Value::as_u64)
        .map(|v| v.min(u32::MAX as u64) as u32)
        .unwrap_or(0)
}

/// Upgrade a raw snapshot object in place to `CURRENT_SCENARIO_VERSION`.
pub fn migrate_snapshot(snapshot: &mut Map<String, Value>) -> Result<MigrationReport, ScenarioError> {
    let version = snapshot_version(snapshot);
    build_migration_registry().migrate(snapshot, version)
}

fn move_key(snapshot: &mut Map<String, Value>, from: &str, to: &str) {
    if snapshot.contains_key(to) {
        snapshot.remove(from);
        return;
    }
    if let Some(value) = snapshot.remove(from) {
        snapshot.insert(to.to_string(), value);
    }
}

/// v0 -> v1: unversioned payloads used `inputs` and `strategies`.
fn rename_legacy_keys(snapshot: &mut Map<String, Value>) -> Result<(), String> {
    move_key(snapshot, "inputs", "rawInputs");
    move_key(snapshot, "strategies", "reductionStrategies");
    Ok(())
}

/// v1 -> v2: strategies without `reductionType` are absolute when they only
/// carry tonnes, percentage otherwise. A legacy `potential` key becomes
/// `reductionPotential`.
fn fill_reduction_type(snapshot: &mut Map<String, Value>) -> Result<(), String> {
    let Some(strategies) = snapshot.get_mut("reductionStrategies") else {
        return Ok(());
    };
    let Some(list) = strategies.as_array_mut() else {
        return Err("reductionStrategies is not an array".to_string());
    };
    for strategy in list.iter_mut().filter_map(Value::as_object_mut) {
        move_key(strategy, "potential", "reductionPotential");
        if strategy.contains_key("reductionType") {
            continue;
        }
        let has_tonnes = strategy.get("reductionTonnes").is_some_and(Value::is_number);
        let has_potential = strategy.get("reductionPotential").is_some_and(Value::is_number);
        let kind = if has_tonnes && !has_potential {
            "absolute"
        } else {
            "percentage"
        };
        strategy.insert("reductionType".to_string(), Value::from(kind));
    }
    Ok(())
}

/// v2 -> v3: older writers stored a stale or missing `emissions.total`.
fn recompute_emissions_total(snapshot: &mut Map<String, Value>) -> Result<(), String> {
    let Some(emissions) = snapshot.get_mut("emissions").and_then(Value::as_object_mut) else {
        return Ok(());
    };
    let scope = |key: &str| emissions.get(key).and_then(Value::as_f64).unwrap_or(0.0);
    let total = scope("scope1") + scope("scope2") + scope("scope3");
    emissions.insert("total".to_string(), Value::from(total));
    Ok(())
}
