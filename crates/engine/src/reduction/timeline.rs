//! Multi-year emissions trajectory against a target line.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::MAX_HORIZON_YEARS;

use super::strategy::ReductionStrategy;

/// One year of the projection. All values in tonnes CO2e.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TimelinePoint {
    pub year: i32,
    /// Reductions scheduled for this year across confirmed strategies.
    pub reduction_this_year: f64,
    pub cumulative_reduction: f64,
    /// Credits retired this year (first year of the horizon only).
    pub credits_applied: f64,
    pub projected_emissions: f64,
    pub target_emissions: f64,
}

pub(crate) fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// Emissions level implied by a percentage reduction target.
pub fn target_emissions(baseline: f64, target_percent: f64) -> f64 {
    baseline.max(0.0) * (1.0 - clamp_percent(target_percent) / 100.0)
}

/// Project emissions over `horizon` years from `start_year`.
///
/// Only confirmed strategies count, using their stored `yearly_reductions`.
/// Reductions scheduled before `start_year` fall outside the horizon and are
/// ignored. `credit_total` is applied once, in the first year. The series
/// stops early rather than run past `i32::MAX`.
pub fn project_timeline(
    baseline: f64,
    strategies: &[ReductionStrategy],
    credit_total: f64,
    target_percent: f64,
    start_year: i32,
    horizon: u32,
) -> Vec<TimelinePoint> {
    let baseline = if baseline.is_finite() { baseline.max(0.0) } else { 0.0 };
    let credits = if credit_total.is_finite() { credit_total.max(0.0) } else { 0.0 };
    let target = target_emissions(baseline, target_percent);
    let horizon = horizon.min(MAX_HORIZON_YEARS);

    let confirmed: Vec<&ReductionStrategy> = strategies.iter().filter(|s| s.is_confirmed()).collect();

    let mut cumulative = 0.0;
    let mut points = Vec::with_capacity(horizon as usize);
    for offset in 0..horizon {
        let Some(year) = start_year.checked_add(offset as i32) else {
            break;
        };
        let reduction_this_year: f64 = confirmed
            .iter()
            .filter_map(|s| s.yearly_reductions().get(&year))
            .map(|t| t.max(0.0))
            .sum();
        cumulative += reduction_this_year;
        let credits_applied = if offset == 0 { credits } else { 0.0 };
        points.push(TimelinePoint {
            year,
            reduction_this_year,
            cumulative_reduction: cumulative,
            credits_applied,
            projected_emissions: (baseline - cumulative - credits_applied).max(0.0),
            target_emissions: target,
        });
    }
    points
}

/// First year whose projection is at or below the target line.
pub fn first_year_meeting_target(timeline: &[TimelinePoint]) -> Option<i32> {
    timeline
        .iter()
        .find(|p| p.projected_emissions <= p.target_emissions)
        .map(|p| p.year)
}
