//! Agent text protocol types for the `--agent` headless mode.
//!
//! External programs (scripts, assistants, test harnesses) drive a calculation
//! session over newline-delimited JSON on stdin/stdout. The I/O loop lives in
//! `crates/app/src/agent_mode.rs`; the types live here so they can be
//! unit-tested without the binary.

use serde::{Deserialize, Serialize};

use crate::compliance_score::InstrumentReadiness;
use crate::reduction::TimelinePoint;
use crate::session::EmissionsReport;
use crate::session_edits::{EditResult, SessionEdit};

// ---------------------------------------------------------------------------
// Commands (stdin → engine)
// ---------------------------------------------------------------------------

/// A single command read from one line of stdin. `cmd` is the tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd")]
pub enum AgentCommand {
    /// Full report for the current revision.
    #[serde(rename = "report")]
    Report,

    /// Apply one edit.
    #[serde(rename = "edit")]
    Edit { edit: SessionEdit },

    /// Apply several edits in order; one recalculation follows.
    #[serde(rename = "batch_edit")]
    BatchEdit { edits: Vec<SessionEdit> },

    /// Year-by-year projection only.
    #[serde(rename = "timeline")]
    Timeline,

    /// Applicable instruments with readiness scores.
    #[serde(rename = "legislation")]
    Legislation,

    /// Store the session under a scenario name.
    #[serde(rename = "save")]
    Save { name: String },

    /// Replace the session with a stored scenario.
    #[serde(rename = "load")]
    Load { name: String },

    /// Start over with a default session.
    #[serde(rename = "reset")]
    Reset,

    /// Step back to the session before the last accepted batch, reset or load.
    #[serde(rename = "undo")]
    Undo,

    #[serde(rename = "redo")]
    Redo,

    #[serde(rename = "quit")]
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (engine → stdout)
// ---------------------------------------------------------------------------

/// Every response carries the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    #[serde(rename = "ready")]
    Ready,

    #[serde(rename = "report")]
    Report { report: Box<EmissionsReport> },

    #[serde(rename = "edit_result")]
    EditResult { revision: u64, result: EditResult },

    #[serde(rename = "batch_result")]
    BatchResult {
        revision: u64,
        results: Vec<EditResult>,
    },

    #[serde(rename = "timeline")]
    Timeline {
        revision: u64,
        timeline: Vec<TimelinePoint>,
        first_year_meeting_target: Option<i32>,
    },

    #[serde(rename = "legislation")]
    Legislation {
        revision: u64,
        jurisdiction: String,
        instruments: Vec<InstrumentReadiness>,
        disclaimer: String,
    },

    /// Generic acknowledgement (save, load, reset, undo, redo).
    #[serde(rename = "ok")]
    Ok,

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "goodbye")]
    Goodbye,
}

impl ResponsePayload {
    /// Project a report into the payload a query command asks for.
    pub fn for_query(command: &AgentCommand, report: &EmissionsReport) -> Option<Self> {
        match command {
            AgentCommand::Report => Some(ResponsePayload::Report {
                report: Box::new(report.clone()),
            }),
            AgentCommand::Timeline => Some(ResponsePayload::Timeline {
                revision: report.revision,
                timeline: report.timeline.clone(),
                first_year_meeting_target: report.first_year_meeting_target,
            }),
            AgentCommand::Legislation => Some(ResponsePayload::Legislation {
                revision: report.revision,
                jurisdiction: report.jurisdiction.clone(),
                instruments: report.legislation.clone(),
                disclaimer: report.disclaimer.clone(),
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 2;

pub fn make_response(payload: ResponsePayload) -> AgentResponse {
    AgentResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
