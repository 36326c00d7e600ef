//! Reduction strategy scheduling and the multi-year trajectory.
//!
//! Realization curves (share of total reduction per year from implementation):
//! - short:  100%
//! - medium: 30% / 50% / 20%
//! - long:   10% / 20% / 30% / 25% / 15%
//!
//! Only confirmed strategies are scheduled or projected.

pub mod schedule;
pub mod strategy;
pub mod target;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use schedule::*;
pub use strategy::*;
pub use target::*;
pub use timeline::*;
