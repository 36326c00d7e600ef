//! `ReductionStrategy`: a declared abatement measure and its lifecycle.
//!
//! A strategy is a draft until confirmed. Confirming freezes the editable
//! fields and stores the yearly schedule; reopening clears the schedule and
//! unlocks the fields again.

use std::collections::BTreeMap;
use std::fmt;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{clamp_year, DEFAULT_START_YEAR};

use super::schedule::schedule;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "lowercase")]
pub enum ReductionType {
    /// `reduction_potential` percent of the baseline.
    #[default]
    Percentage,
    /// A fixed `reduction_tonnes`.
    Absolute,
}

/// Cost tagging only; no currency modelling.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Encode, Decode,
)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Low,
    #[default]
    Medium,
    High,
}

impl CostTier {
    pub fn all() -> [CostTier; 3] {
        [CostTier::Low, CostTier::Medium, CostTier::High]
    }

    pub fn label(self) -> &'static str {
        match self {
            CostTier::Low => "low",
            CostTier::Medium => "medium",
            CostTier::High => "high",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Short,
    Medium,
    Long,
}

impl Timeframe {
    /// Share of the total reduction realized in each year from implementation.
    pub fn weights(self) -> &'static [f64] {
        match self {
            Timeframe::Short => &[1.0],
            Timeframe::Medium => &[0.3, 0.5, 0.2],
            Timeframe::Long => &[0.1, 0.2, 0.3, 0.25, 0.15],
        }
    }

    /// Years from implementation to full realization.
    pub fn realization_offset(self) -> i32 {
        match self {
            Timeframe::Short => 0,
            Timeframe::Medium => 2,
            Timeframe::Long => 4,
        }
    }
}

/// The user-editable part of a strategy. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct StrategyFields {
    pub category: String,
    pub reduction_type: ReductionType,
    /// Percent of baseline, 0-100. Used when `reduction_type` is `Percentage`.
    pub reduction_potential: Option<f64>,
    /// Absolute tonnes. Used when `reduction_type` is `Absolute`.
    pub reduction_tonnes: Option<f64>,
    pub implementation_cost: CostTier,
    pub timeframe: Timeframe,
    pub implementation_year: i32,
}

impl Default for StrategyFields {
    fn default() -> Self {
        Self {
            category: String::new(),
            reduction_type: ReductionType::Percentage,
            reduction_potential: None,
            reduction_tonnes: None,
            implementation_cost: CostTier::Medium,
            timeframe: Timeframe::Short,
            implementation_year: DEFAULT_START_YEAR,
        }
    }
}

impl StrategyFields {
    pub fn percentage(category: impl Into<String>, potential: f64) -> Self {
        Self {
            category: category.into(),
            reduction_type: ReductionType::Percentage,
            reduction_potential: Some(potential),
            ..Default::default()
        }
    }

    pub fn absolute(category: impl Into<String>, tonnes: f64) -> Self {
        Self {
            category: category.into(),
            reduction_type: ReductionType::Absolute,
            reduction_tonnes: Some(tonnes),
            ..Default::default()
        }
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.implementation_year = year;
        self
    }

    pub fn with_cost(mut self, cost: CostTier) -> Self {
        self.implementation_cost = cost;
        self
    }
}

/// Attempted to edit a confirmed strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyLocked {
    pub id: String,
}

impl fmt::Display for StrategyLocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strategy '{}' is confirmed; reopen it to edit", self.id)
    }
}

impl std::error::Error for StrategyLocked {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ReductionStrategy {
    id: String,
    #[serde(flatten)]
    fields: StrategyFields,
    full_realization_year: i32,
    yearly_reductions: BTreeMap<i32, f64>,
    is_confirmed: bool,
}

impl ReductionStrategy {
    /// A new, unconfirmed strategy. The implementation year is clamped to
    /// `MIN_YEAR..=MAX_YEAR`.
    pub fn new(id: impl Into<String>, mut fields: StrategyFields) -> Self {
        fields.implementation_year = clamp_year(fields.implementation_year);
        let full_realization_year = fields.implementation_year + fields.timeframe.realization_offset();
        Self {
            id: id.into(),
            fields,
            full_realization_year,
            yearly_reductions: BTreeMap::new(),
            is_confirmed: false,
        }
    }

    /// Rebuild a strategy from stored state, e.g. a scenario file.
    ///
    /// `full_realization_year` is always re-derived. A stored schedule is kept
    /// only for confirmed strategies.
    pub fn restore(
        id: impl Into<String>,
        fields: StrategyFields,
        is_confirmed: bool,
        yearly_reductions: BTreeMap<i32, f64>,
    ) -> Self {
        let mut strategy = Self::new(id, fields);
        if is_confirmed {
            strategy.is_confirmed = true;
            strategy.yearly_reductions = yearly_reductions;
        }
        strategy
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fields(&self) -> &StrategyFields {
        &self.fields
    }

    pub fn category(&self) -> &str {
        &self.fields.category
    }

    pub fn reduction_type(&self) -> ReductionType {
        self.fields.reduction_type
    }

    pub fn implementation_cost(&self) -> CostTier {
        self.fields.implementation_cost
    }

    pub fn timeframe(&self) -> Timeframe {
        self.fields.timeframe
    }

    pub fn implementation_year(&self) -> i32 {
        self.fields.implementation_year
    }

    pub fn full_realization_year(&self) -> i32 {
        self.full_realization_year
    }

    pub fn yearly_reductions(&self) -> &BTreeMap<i32, f64> {
        &self.yearly_reductions
    }

    pub fn is_confirmed(&self) -> bool {
        self.is_confirmed
    }

    fn ensure_editable(&self) -> Result<(), StrategyLocked> {
        if self.is_confirmed {
            Err(StrategyLocked {
                id: self.id.clone(),
            })
        } else {
            Ok(())
        }
    }

    /// Replace the editable fields.
    pub fn update(&mut self, mut fields: StrategyFields) -> Result<(), StrategyLocked> {
        self.ensure_editable()?;
        fields.implementation_year = clamp_year(fields.implementation_year);
        self.fields = fields;
        self.full_realization_year =
            self.fields.implementation_year + self.fields.timeframe.realization_offset();
        Ok(())
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> Result<(), StrategyLocked> {
        let fields = StrategyFields {
            timeframe,
            ..self.fields.clone()
        };
        self.update(fields)
    }

    pub fn set_implementation_year(&mut self, year: i32) -> Result<(), StrategyLocked> {
        let fields = StrategyFields {
            implementation_year: year,
            ..self.fields.clone()
        };
        self.update(fields)
    }

    /// Freeze the fields and compute the yearly schedule against `baseline`.
    /// Confirming an already confirmed strategy recomputes its schedule.
    pub fn confirm(&mut self, baseline: f64) {
        self.is_confirmed = true;
        self.yearly_reductions = schedule(self, baseline);
    }

    /// Unlock for editing. The schedule is cleared.
    pub fn reopen(&mut self) {
        self.is_confirmed = false;
        self.yearly_reductions.clear();
    }

    /// Copy with the schedule recomputed against a new baseline. Drafts are
    /// returned unchanged.
    pub fn rebaselined(&self, baseline: f64) -> Self {
        let mut copy = self.clone();
        if copy.is_confirmed {
            copy.yearly_reductions = schedule(&copy, baseline);
        }
        copy
    }
}
