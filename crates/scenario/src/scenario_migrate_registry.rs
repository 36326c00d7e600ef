// ---------------------------------------------------------------------------
// Scenario migration registry: validated chain of JSON upgrade steps
// ---------------------------------------------------------------------------
//
// Each step is a function `fn(&mut Map)` that upgrades a raw snapshot object
// from version N to N+1. Steps operate on JSON rather than the typed snapshot
// because older payloads use keys the typed struct no longer has.

use serde_json::{Map, Value};

use crate::scenario_error::ScenarioError;

pub(crate) type MigrateFn = fn(&mut Map<String, Value>) -> Result<(), String>;

/// A single migration step: upgrades a snapshot from `from_version` to `from_version + 1`.
pub(crate) struct MigrationStep {
    pub from_version: u32,
    pub description: &'static str,
    pub migrate_fn: MigrateFn,
}

/// Outcome of running the migration chain on one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub original_version: u32,
    pub final_version: u32,
    pub steps_applied: u32,
    pub step_descriptions: Vec<&'static str>,
}

pub(crate) struct MigrationRegistry {
    steps: Vec<MigrationStep>,
    current_version: u32,
}

impl MigrationRegistry {
    /// Build a registry from a list of migration steps.
    ///
    /// # Panics
    ///
    /// Panics if the chain has duplicate source versions or a gap between
    /// v0 and `current_version`.
    pub fn new(steps: Vec<MigrationStep>, current_version: u32) -> Self {
        let mut seen = std::collections::HashSet::new();
        for step in &steps {
            assert!(
                seen.insert(step.from_version),
                "Duplicate migration step for version {}",
                step.from_version
            );
        }

        for v in 0..current_version {
            assert!(
                seen.contains(&v),
                "Missing migration step from v{} to v{}. The migration chain must be \
                 contiguous from v0 to v{}.",
                v,
                v + 1,
                current_version
            );
        }

        let mut steps = steps;
        steps.sort_by_key(|s| s.from_version);

        Self {
            steps,
            current_version,
        }
    }

    /// Upgrade `snapshot` (whose version is `version`) to `current_version`,
    /// writing the new version into the object.
    ///
    /// # Errors
    ///
    /// `VersionMismatch` for payloads from a newer build, `MigrationFailed`
    /// when a step cannot make sense of the payload.
    pub fn migrate(
        &self,
        snapshot: &mut Map<String, Value>,
        version: u32,
    ) -> Result<MigrationReport, ScenarioError> {
        if version > self.current_version {
            return Err(ScenarioError::VersionMismatch {
                expected_max: self.current_version,
                found: version,
            });
        }

        let mut current = version;
        let mut step_descriptions = Vec::new();
        for step in &self.steps {
            if current >= self.current_version {
                break;
            }
            if step.from_version == current {
                (step.migrate_fn)(snapshot).map_err(|e| {
                    ScenarioError::MigrationFailed(format!(
                        "v{} -> v{}: {e}",
                        step.from_version,
                        step.from_version + 1
                    ))
                })?;
                current = step.from_version + 1;
                step_descriptions.push(step.description);
            }
        }
        snapshot.insert("version".to_string(), Value::from(current));

        Ok(MigrationReport {
            original_version: version,
            final_version: current,
            steps_applied: step_descriptions.len() as u32,
            step_descriptions,
        })
    }

    #[cfg(test)]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Map<String, Value>) -> Result<(), String> {
        Ok(())
    }

    #[test]
    #[should_panic(expected = "Duplicate migration step")]
    fn test_registry_rejects_duplicate_steps() {
        let steps = vec![
            MigrationStep {
                from_version: 0,
                description: "first",
                migrate_fn: noop,
            },
            MigrationStep {
                from_version: 0,
                description: "duplicate",
                migrate_fn: noop,
            },
        ];
        MigrationRegistry::new(steps, 1);
    }

    #[test]
    #[should_panic(expected = "Missing migration step")]
    fn test_registry_rejects_gaps() {
        let steps = vec![
            MigrationStep {
                from_version: 0,
                description: "v0->v1",
                migrate_fn: noop,
            },
            MigrationStep {
                from_version: 2,
                description: "v2->v3",
                migrate_fn: noop,
            },
        ];
        MigrationRegistry::new(steps, 3);
    }

    #[test]
    fn test_failing_step_reports_versions() {
        let steps = vec![MigrationStep {
            from_version: 0,
            description: "always fails",
            migrate_fn: |_| Err("bad shape".to_string()),
        }];
        let registry = MigrationRegistry::new(steps, 1);
        let err = registry.migrate(&mut Map::new(), 0).unwrap_err();
        match err {
            ScenarioError::MigrationFailed(msg) => {
                assert!(msg.contains("v0 -> v1"), "got: {msg}");
                assert!(msg.contains("bad shape"), "got: {msg}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
