//! Emission factor catalog and resolution of activity quantities into kg CO2e.
//!
//! A factor is "kg CO2e per activity unit". Each activity source resolves
//! against the catalog by its factor family name:
//!
//! 1. A factor for the same family *and* the session's region code wins.
//! 2. Otherwise the generic factor (no region code) is used.
//! 3. Otherwise the factor is 0 and the source contributes nothing.
//!
//! Name matching is case-insensitive; exact names beat substring matches, and
//! among equally good matches the factor whose category equals the source's
//! category wins. Nothing here fails: missing data only lowers precision.

pub mod catalog;
pub mod defaults;
pub mod provider;
pub mod resolve;


pub use catalog::*;
pub use defaults::*;
pub use provider::*;
pub use resolve::*;
