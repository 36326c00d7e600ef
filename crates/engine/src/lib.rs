use bevy::prelude::*;

pub mod activity;
pub mod agent_protocol;
pub mod catalog_sync;
pub mod compliance_score;
pub mod config;
pub mod credits;
pub mod engine_sets;
pub mod factors;
pub mod invariants;
pub mod legislation;
pub mod offsets;
pub mod organization;
pub mod reduction;
pub mod scopes;
pub mod session;
pub mod session_edits;
pub mod session_history;
pub mod sources;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
pub mod test_harness;

pub use engine_sets::EngineSet;

/// Decode bytes via `bitcode::decode`, logging a warning and returning `Default` on failure.
pub fn decode_or_warn<T: bitcode::DecodeOwned + Default>(key: &str, bytes: &[u8]) -> T {
    match bitcode::decode(bytes) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "Snapshot {}: failed to decode {} bytes, falling back to default: {}",
                key,
                bytes.len(),
                e
            );
            T::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers the session, policy resources and the edit → recalculate →
/// report pipeline. Add `MinimalPlugins` (or more) alongside it.
pub struct EnginePlugin;

impl Plugin for EnginePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<session::CalculationSession>()
            .init_resource::<session::LatestReport>()
            .init_resource::<session::RecalcThrottle>()
            .init_resource::<factors::FactorCatalog>()
            .init_resource::<offsets::OffsetRuleTable>()
            .init_resource::<legislation::LegislationTable>()
            .init_resource::<compliance_score::ComplianceWeights>()
            .add_event::<session::ReportUpdated>();

        app.add_plugins((
            engine_sets::EngineSetsPlugin,
            session_edits::SessionEditsPlugin,
            session_history::SessionHistoryPlugin,
            catalog_sync::CatalogSyncPlugin,
            invariants::ReportInvariantsPlugin,
        ));

        app.add_systems(
            Update,
            (
                session::mark_dirty_on_policy_change,
                session::recalculate_session.run_if(session::session_is_dirty),
            )
                .chain()
                .in_set(EngineSet::Recalculate),
        );
    }
}
