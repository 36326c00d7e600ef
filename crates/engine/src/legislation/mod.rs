//! Jurisdiction normalization and instrument applicability.
//!
//! Instruments are data: each holds numeric `LegislationThreshold` conditions
//! joined by `Any`/`All`. Unknown jurisdictions are passed through as
//! title-cased labels and have no applicable instruments.

pub mod instruments;
pub mod jurisdiction;


pub use instruments::*;
pub use jurisdiction::*;
