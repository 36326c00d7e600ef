//! Target progress and cost-tier rollups over confirmed strategies.

use serde::{Deserialize, Serialize};

use crate::config::SCOPE_SUM_TOLERANCE;

use super::schedule::total_reduction;
use super::strategy::{CostTier, ReductionStrategy};
use super::timeline::{clamp_percent, target_emissions};

/// How far the committed strategies go toward the reduction target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSummary {
    pub baseline: f64,
    pub target_percent: f64,
    pub target_emissions: f64,
    pub required_reduction: f64,
    /// Full-realization tonnes of confirmed strategies.
    pub committed_reduction: f64,
    pub remaining_gap: f64,
    pub on_track: bool,
}

impl TargetSummary {
    pub fn compute(baseline: f64, target_percent: f64, strategies: &[ReductionStrategy]) -> Self {
        let baseline = if baseline.is_finite() { baseline.max(0.0) } else { 0.0 };
        let target = target_emissions(baseline, target_percent);
        let required = baseline - target;
        let committed: f64 = strategies
            .iter()
            .filter(|s| s.is_confirmed())
            .map(|s| total_reduction(s, baseline))
            .sum();
        let gap = (required - committed).max(0.0);
        Self {
            baseline,
            target_percent: clamp_percent(target_percent),
            target_emissions: target,
            required_reduction: required,
            committed_reduction: committed,
            remaining_gap: gap,
            on_track: gap <= SCOPE_SUM_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierTotals {
    pub strategies: u32,
    pub tonnes: f64,
}

/// Confirmed strategies and committed tonnes grouped by cost tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyCostSummary {
    pub low: TierTotals,
    pub medium: TierTotals,
    pub high: TierTotals,
}

impl StrategyCostSummary {
    pub fn compute(strategies: &[ReductionStrategy], baseline: f64) -> Self {
        let mut summary = Self::default();
        for strategy in strategies.iter().filter(|s| s.is_confirmed()) {
            let tier = summary.tier_mut(strategy.implementation_cost());
            tier.strategies += 1;
            tier.tonnes += total_reduction(strategy, baseline);
        }
        summary
    }

    pub fn tier(&self, tier: CostTier) -> &TierTotals {
        match tier {
            CostTier::Low => &self.low,
            CostTier::Medium => &self.medium,
            CostTier::High => &self.high,
        }
    }

    fn tier_mut(&mut self, tier: CostTier) -> &mut TierTotals {
        match tier {
            CostTier::Low => &mut self.low,
            CostTier::Medium => &mut self.medium,
            CostTier::High => &mut self.high,
        }
    }

    pub fn total_strategies(&self) -> u32 {
        CostTier::all().iter().map(|t| self.tier(*t).strategies).sum()
    }
}
