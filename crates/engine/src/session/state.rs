//! `CalculationSession` resource: everything the user has entered.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityInputs;
use crate::config::{
    DEFAULT_ACTIVE_SECTION, DEFAULT_HORIZON_YEARS, DEFAULT_JURISDICTION, DEFAULT_REDUCTION_TARGET,
    DEFAULT_REGION,
};
use crate::credits::{total_credits, CarbonCreditSelection, CreditProject};
use crate::organization::OrganizationProfile;
use crate::reduction::ReductionStrategy;

const SESSION_KEY: &str = "calculation_session";

/// Explicit, versioned calculation state.
///
/// Every accepted edit bumps `revision` and sets `dirty`; the recalculation
/// system clears `dirty` after writing a fresh report.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct CalculationSession {
    pub revision: u64,
    pub dirty: bool,
    /// Factor region code (e.g. `AU`).
    pub region: String,
    /// Jurisdiction as entered; normalized on use.
    pub jurisdiction: String,
    pub inputs: ActivityInputs,
    pub organization: OrganizationProfile,
    pub strategies: Vec<ReductionStrategy>,
    pub credit_selections: Vec<CarbonCreditSelection>,
    pub credit_projects: Vec<CreditProject>,
    /// Percent reduction target, 0-100.
    pub reduction_target: f64,
    pub horizon_years: u32,
    /// Presentation-layer section the user was on; carried through scenarios.
    pub active_section: String,
}

impl Default for CalculationSession {
    fn default() -> Self {
        Self {
            revision: 0,
            dirty: true,
            region: DEFAULT_REGION.to_string(),
            jurisdiction: DEFAULT_JURISDICTION.to_string(),
            inputs: ActivityInputs::default(),
            organization: OrganizationProfile::default(),
            strategies: Vec::new(),
            credit_selections: Vec::new(),
            credit_projects: Vec::new(),
            reduction_target: DEFAULT_REDUCTION_TARGET,
            horizon_years: DEFAULT_HORIZON_YEARS,
            active_section: DEFAULT_ACTIVE_SECTION.to_string(),
        }
    }
}

impl CalculationSession {
    /// Record an accepted change.
    pub fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.dirty = true;
    }

    pub fn start_year(&self) -> i32 {
        self.organization.start_year()
    }

    pub fn strategy(&self, id: &str) -> Option<&ReductionStrategy> {
        self.strategies.iter().find(|s| s.id() == id)
    }

    pub fn strategy_mut(&mut self, id: &str) -> Option<&mut ReductionStrategy> {
        self.strategies.iter_mut().find(|s| s.id() == id)
    }

    /// Tonnes of credits currently selected.
    pub fn credit_total(&self) -> f64 {
        total_credits(&self.credit_selections)
    }

    /// Replace the whole state with `other`, keeping the revision monotonic.
    pub fn replace_with(&mut self, other: CalculationSession) {
        let revision = self.revision;
        *self = other;
        self.revision = revision;
        self.touch();
    }

    /// Compact binary snapshot, for undo buffers and fast in-process copies.
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Restore from [`to_bytes`](Self::to_bytes). Corrupt bytes give a default
    /// session with a warning.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        crate::decode_or_warn(SESSION_KEY, bytes)
    }
}
