//! `carbonplan`: headless emissions engine.
//!
//! Usage:
//!   carbonplan --agent              JSON-lines protocol on stdin/stdout
//!   carbonplan report <scenario>    print the report for a scenario file

mod agent_mode;
mod report_mode;

use std::path::PathBuf;
use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use scenario::{ActiveScenarioStore, FileScenarioStore, ScenarioPlugin};

/// Directory for named scenarios in agent mode.
const SCENARIO_DIR_ENV: &str = "CARBONPLAN_SCENARIO_DIR";
const DEFAULT_SCENARIO_DIR: &str = "scenarios";

/// A headless app with the engine and scenario plugins. Logs go to stderr.
pub(crate) fn build_app(store: Option<FileScenarioStore>) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(LogPlugin::default());
    if let Some(store) = store {
        app.insert_resource(ActiveScenarioStore::new(store));
    }
    app.add_plugins((engine::EnginePlugin, ScenarioPlugin));
    app.update();
    app
}

fn usage() -> ExitCode {
    eprintln!("usage: carbonplan --agent | carbonplan report <scenario-file>");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("--agent") => {
            let dir = std::env::var(SCENARIO_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCENARIO_DIR));
            agent_mode::run_agent_mode(FileScenarioStore::new(dir));
            ExitCode::SUCCESS
        }
        Some("report") => match args.get(1) {
            Some(path) => report_mode::run_report(path),
            None => usage(),
        },
        _ => usage(),
    }
}
