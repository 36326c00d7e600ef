//! Offset requirements from jurisdiction rules and total emissions.
//!
//! `is_required = mandatory && total > threshold`. The offset amount is the
//! applicable tier's percentage of the total, or zero when the tier has no
//! numeric percentage. Voluntary benchmarks:
//! - carbon neutral: 100% of emissions
//! - science-based target: 57.5% (after a 42.5% cut)
//! - net zero: 10% residual (after a 90% cut)

pub mod calculations;
pub mod rules;


pub use calculations::*;
pub use rules::*;
