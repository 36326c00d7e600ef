//! One-shot `report <scenario>` mode: load a scenario file (headered or plain
//! JSON), run one recalculation and print the report as JSON on stdout.

use std::process::ExitCode;

use bevy::prelude::*;

use engine::session::{CalculationSession, LatestReport};
use scenario::scenario_codec::decode_scenario;

pub fn run_report(path: &str) -> ExitCode {
    let mut app = crate::build_app(None);

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Cannot read scenario '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };
    let session = match decode_scenario(&bytes) {
        Ok(snapshot) => snapshot.into_session(),
        Err(e) => {
            error!("Cannot load scenario '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    app.world_mut()
        .resource_mut::<CalculationSession>()
        .replace_with(session);
    app.update();

    let Some(report) = app.world().resource::<LatestReport>().get() else {
        error!("No report was produced for '{}'", path);
        return ExitCode::FAILURE;
    };
    match serde_json::to_string_pretty(report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Cannot encode report: {}", e);
            ExitCode::FAILURE
        }
    }
}
