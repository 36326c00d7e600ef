//! The calculation session and its recalculation pipeline.
//!
//! Edits mark the session dirty; `recalculate_session` turns a dirty session
//! into a fresh `LatestReport` and a `ReportUpdated` event. Nothing here reads
//! a wall clock: the horizon starts at the organization's reporting year.

pub mod recalculate;
pub mod state;
pub mod systems;

#[cfg(test)]
mod tests;

pub use recalculate::*;
pub use state::*;
pub use systems::*;
