//! Background refresh of the `FactorCatalog` from an external provider.
//!
//! A fetch is started whenever the session's region or reporting year differs
//! from the last request. The provider runs on the async compute pool; the
//! catalog resource is only replaced once the task finishes, so calculations
//! never wait on it.

use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};

use crate::factors::{catalog_or_default, FactorCatalog, FactorCatalogProvider};
use crate::session::CalculationSession;

/// The configured provider, if any. Without one the built-in catalog is used.
#[derive(Resource, Clone, Default)]
pub struct CatalogProviderHandle(pub Option<Arc<dyn FactorCatalogProvider>>);

impl CatalogProviderHandle {
    pub fn new(provider: impl FactorCatalogProvider) -> Self {
        Self(Some(Arc::new(provider)))
    }
}

/// State of the in-flight fetch.
#[derive(Resource, Default)]
pub struct CatalogFetch {
    task: Option<Task<FactorCatalog>>,
    requested: Option<(String, i32)>,
}

impl CatalogFetch {
    pub fn in_flight(&self) -> bool {
        self.task.is_some()
    }

    /// Region and year of the most recent request.
    pub fn requested(&self) -> Option<(&str, i32)> {
        self.requested.as_ref().map(|(r, y)| (r.as_str(), *y))
    }
}

/// Spawn a fetch when the session's region or year moved since the last one.
/// A fetch already in flight is dropped (cancelled) in favour of the new one.
pub fn start_catalog_fetch(
    provider: Res<CatalogProviderHandle>,
    session: Res<CalculationSession>,
    mut fetch: ResMut<CatalogFetch>,
) {
    let Some(provider) = provider.0.clone() else {
        return;
    };
    let region = session.region.clone();
    let year = session.start_year();
    if fetch.requested() == Some((region.as_str(), year)) {
        return;
    }

    debug!("Fetching emission factors for {} ({})", region, year);
    fetch.requested = Some((region.clone(), year));
    let pool = AsyncComputeTaskPool::get();
    fetch.task = Some(pool.spawn(async move { catalog_or_default(provider.as_ref(), &region, year) }));
}

/// Install a finished fetch. An unchanged catalog is left alone so the
/// session is not marked dirty for nothing.
pub fn poll_catalog_fetch(mut fetch: ResMut<CatalogFetch>, mut catalog: ResMut<FactorCatalog>) {
    let Some(task) = fetch.task.as_mut() else {
        return;
    };
    let Some(result) = block_on(futures_lite::future::poll_once(task)) else {
        return;
    };
    fetch.task = None;
    if *catalog != result {
        *catalog = result;
    }
}

pub struct CatalogSyncPlugin;

impl Plugin for CatalogSyncPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CatalogProviderHandle>()
            .init_resource::<CatalogFetch>()
            .add_systems(
                Update,
                (start_catalog_fetch, poll_catalog_fetch)
                    .chain()
                    .after(crate::session_edits::execute_queued_edits)
                    .in_set(crate::EngineSet::Input),
            );
    }
}
