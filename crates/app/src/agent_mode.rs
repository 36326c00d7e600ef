//! Headless `--agent` mode: a blocking loop that reads JSON commands from
//! stdin and writes JSON responses to stdout.
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`engine::agent_protocol`] for the full schema.
//! Diagnostics go to stderr.

use std::io::{BufRead, Write};

use bevy::prelude::*;

use engine::agent_protocol::{
    make_response, AgentCommand, AgentResponse, ResponsePayload, PROTOCOL_VERSION,
};
use engine::session::{CalculationSession, LatestReport};
use engine::session_edits::{
    EditQueue, EditResult, EditResultLog, EditSource, SessionEdit, MAX_LOGGED_EDITS,
};
use engine::session_history::{HistoryRequest, LastHistoryOutcome, SessionHistory};
use scenario::{
    FileScenarioStore, LastPersistenceOutcome, LoadScenarioEvent, PersistenceOutcomeEvent,
    SaveScenarioEvent,
};

/// Updates allowed for a dirty session to publish its report.
const MAX_SETTLE_UPDATES: u32 = 8;

pub fn run_agent_mode(store: FileScenarioStore) {
    info!("Scenario store at {}", store.dir().display());
    let mut app = crate::build_app(Some(store));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    write_response(&mut stdout, &make_response(ResponsePayload::Ready));
    info!("carbonplan agent mode v{} ready", PROTOCOL_VERSION);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let cmd: AgentCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                let resp = make_response(ResponsePayload::Error {
                    message: format!("Parse error: {e}"),
                });
                write_response(&mut stdout, &resp);
                continue;
            }
        };

        let response = process_command(cmd, &mut app);
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);
        write_response(&mut stdout, &response);

        if is_goodbye {
            break;
        }
    }

    info!("carbonplan agent mode shutting down");
}

fn write_response(out: &mut impl Write, response: &AgentResponse) {
    let line = serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"protocol_version":{PROTOCOL_VERSION},"type":"error","message":"cannot encode response: {e}"}}"#
        )
    });
    if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
        error!("stdout write error: {e}");
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

fn revision(app: &App) -> u64 {
    app.world().resource::<CalculationSession>().revision
}

/// Run updates until the published report matches the session revision.
fn settle(app: &mut App) {
    for _ in 0..MAX_SETTLE_UPDATES {
        let current = revision(app);
        if app.world().resource::<LatestReport>().is_current(current) {
            return;
        }
        app.update();
    }
}

fn persistence_response(app: &mut App, event: Option<PersistenceOutcomeEvent>) -> AgentResponse {
    match event {
        Some(event) if event.outcome.success => {
            settle(app);
            make_response(ResponsePayload::Ok)
        }
        Some(event) => make_response(ResponsePayload::Error {
            message: event
                .outcome
                .error
                .unwrap_or_else(|| format!("scenario '{}' failed", event.name)),
        }),
        None => make_response(ResponsePayload::Error {
            message: "scenario request was not processed".to_string(),
        }),
    }
}

fn take_outcome(app: &mut App) -> Option<PersistenceOutcomeEvent> {
    app.world_mut().resource_mut::<LastPersistenceOutcome>().0.take()
}

/// Queue `edits`, run one update and collect exactly their results. One
/// recalculation follows the whole batch.
fn run_edits(app: &mut App, edits: Vec<SessionEdit>) -> Option<Vec<EditResult>> {
    let mark = app.world().resource::<EditResultLog>().next_sequence();
    {
        let mut queue = app.world_mut().resource_mut::<EditQueue>();
        for edit in edits {
            queue.push(EditSource::Agent, edit);
        }
    }
    app.update();

    let entries = app.world().resource::<EditResultLog>().since(mark)?;
    Some(entries.iter().map(|entry| entry.result.clone()).collect())
}

fn history_response(app: &mut App, request: HistoryRequest) -> AgentResponse {
    app.world_mut().resource_mut::<LastHistoryOutcome>().0 = None;
    app.world_mut().send_event(request);
    app.update();
    match app.world_mut().resource_mut::<LastHistoryOutcome>().0.take() {
        Some(true) => {
            settle(app);
            make_response(ResponsePayload::Ok)
        }
        _ => make_response(ResponsePayload::Error {
            message: match request {
                HistoryRequest::Undo => "nothing to undo".to_string(),
                HistoryRequest::Redo => "nothing to redo".to_string(),
            },
        }),
    }
}

fn process_command(cmd: AgentCommand, app: &mut App) -> AgentResponse {
    match cmd {
        AgentCommand::Report | AgentCommand::Timeline | AgentCommand::Legislation => {
            settle(app);
            match app.world().resource::<LatestReport>().get() {
                Some(report) => ResponsePayload::for_query(&cmd, report)
                    .map(make_response)
                    .unwrap_or_else(|| {
                        make_response(ResponsePayload::Error {
                            message: "unsupported query".to_string(),
                        })
                    }),
                None => make_response(ResponsePayload::Error {
                    message: "no report available yet".to_string(),
                }),
            }
        }

        AgentCommand::Edit { edit } => match run_edits(app, vec![edit]) {
            Some(mut results) if results.len() == 1 => make_response(ResponsePayload::EditResult {
                revision: revision(app),
                result: results.remove(0),
            }),
            _ => make_response(ResponsePayload::Error {
                message: "edit result was not recorded".to_string(),
            }),
        },

        AgentCommand::BatchEdit { edits } => {
            if edits.len() > MAX_LOGGED_EDITS {
                return make_response(ResponsePayload::Error {
                    message: format!(
                        "batch of {} edits exceeds the limit of {MAX_LOGGED_EDITS}",
                        edits.len()
                    ),
                });
            }
            let count = edits.len();
            match run_edits(app, edits) {
                Some(results) if results.len() == count => {
                    make_response(ResponsePayload::BatchResult {
                        revision: revision(app),
                        results,
                    })
                }
                _ => make_response(ResponsePayload::Error {
                    message: "batch results were not recorded".to_string(),
                }),
            }
        }

        AgentCommand::Save { name } => {
            take_outcome(app);
            app.world_mut().send_event(SaveScenarioEvent { name });
            app.update();
            let outcome = take_outcome(app);
            persistence_response(app, outcome)
        }

        AgentCommand::Load { name } => {
            take_outcome(app);
            app.world_mut().send_event(LoadScenarioEvent { name });
            app.update();
            let outcome = take_outcome(app);
            persistence_response(app, outcome)
        }

        AgentCommand::Reset => {
            let world = app.world_mut();
            let before = world.resource::<CalculationSession>().clone();
            world.resource_mut::<SessionHistory>().record(&before);
            world
                .resource_mut::<CalculationSession>()
                .replace_with(CalculationSession::default());
            app.update();
            make_response(ResponsePayload::Ok)
        }

        AgentCommand::Undo => history_response(app, HistoryRequest::Undo),
        AgentCommand::Redo => history_response(app, HistoryRequest::Redo),

        AgentCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}
