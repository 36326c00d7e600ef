//! Per-strategy yearly reduction schedule.

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::strategy::{ReductionStrategy, ReductionType};

fn finite_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Total tonnes a strategy removes from `baseline` once fully realized.
///
/// Percentage strategies use the potential clamped to 0-100; absolute
/// strategies use the tonnes clamped to `>= 0`. A strategy whose selected
/// field is unset removes nothing.
pub fn total_reduction(strategy: &ReductionStrategy, baseline: f64) -> f64 {
    let fields = strategy.fields();
    match fields.reduction_type {
        ReductionType::Percentage => match fields.reduction_potential {
            Some(potential) => {
                let potential = if potential.is_nan() {
                    0.0
                } else {
                    potential.clamp(0.0, 100.0)
                };
                finite_non_negative(baseline) * potential / 100.0
            }
            None => {
                debug!("Strategy '{}' has no reduction potential; counting 0", strategy.id());
                0.0
            }
        },
        ReductionType::Absolute => match fields.reduction_tonnes {
            Some(tonnes) => finite_non_negative(tonnes),
            None => {
                debug!("Strategy '{}' has no reduction tonnes; counting 0", strategy.id());
                0.0
            }
        },
    }
}

/// Yearly tonnes for a confirmed strategy, starting at its implementation
/// year and following its timeframe's weight curve. Drafts get an empty map.
pub fn schedule(strategy: &ReductionStrategy, baseline: f64) -> BTreeMap<i32, f64> {
    let mut yearly = BTreeMap::new();
    if !strategy.is_confirmed() {
        return yearly;
    }
    let total = total_reduction(strategy, baseline);
    let start = strategy.implementation_year();
    for (offset, weight) in strategy.timeframe().weights().iter().enumerate() {
        let Some(year) = start.checked_add(offset as i32) else {
            break;
        };
        yearly.insert(year, total * weight);
    }
    yearly
}
