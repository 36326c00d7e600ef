//! # TestSession: headless harness for engine integration tests
//!
//! Wraps `bevy::app::App` + `MinimalPlugins` + `EnginePlugin`. Tests push
//! edits through the real queue, call `update()` and inspect the published
//! report, exactly as the agent driver does.

use bevy::app::App;
use bevy::prelude::*;

use crate::session::{CalculationSession, EmissionsReport, LatestReport};
use crate::session_edits::{EditQueue, EditResult, EditResultLog, EditSource, RawValue, SessionEdit};
use crate::EnginePlugin;

pub struct TestSession {
    app: App,
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSession {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A default session with the first report already published.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(EnginePlugin);
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    pub fn with_region(mut self, region: &str) -> Self {
        self.edit(SessionEdit::SetRegion {
            region: region.to_string(),
        });
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: &str) -> Self {
        self.edit(SessionEdit::SetJurisdiction {
            jurisdiction: jurisdiction.to_string(),
        });
        self
    }

    pub fn with_activity(mut self, id: &str, quantity: f64) -> Self {
        self.edit(SessionEdit::SetActivity {
            id: id.to_string(),
            value: RawValue::Number(quantity),
        });
        self
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Queue an edit from the test (applied on the next `update`).
    pub fn push(&mut self, edit: SessionEdit) {
        self.app
            .world_mut()
            .resource_mut::<EditQueue>()
            .push(EditSource::User, edit);
    }

    /// Queue an edit and run one update. Returns the logged result.
    pub fn edit(&mut self, edit: SessionEdit) -> EditResult {
        self.push(edit);
        self.update(1);
        self.last_result()
            .unwrap_or(EditResult::Success)
    }

    /// Run `n` updates. A `yield_now()` between updates lets catalog fetches
    /// on the async pool make progress.
    pub fn update(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
            std::thread::yield_now();
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn session(&self) -> &CalculationSession {
        self.app.world().resource::<CalculationSession>()
    }

    /// The published report. Panics if none has been written yet.
    pub fn report(&self) -> &EmissionsReport {
        self.app
            .world()
            .resource::<LatestReport>()
            .get()
            .expect("no report published yet")
    }

    pub fn last_result(&self) -> Option<EditResult> {
        self.app
            .world()
            .resource::<EditResultLog>()
            .last()
            .map(|entry| entry.result.clone())
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert the report total is within `tolerance` tonnes of `expected`.
    pub fn assert_total_close(&self, expected: f64, tolerance: f64) {
        let total = self.report().emissions.total;
        assert!(
            (total - expected).abs() <= tolerance,
            "Expected total {expected} ± {tolerance} t, got {total}"
        );
    }

    /// Assert the published report matches the current revision.
    pub fn assert_report_current(&self) {
        let revision = self.session().revision;
        assert!(
            self.resource::<LatestReport>().is_current(revision),
            "report is stale: session at revision {revision}"
        );
    }
}
