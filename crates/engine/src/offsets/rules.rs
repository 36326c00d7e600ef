//! Per-jurisdiction offset rules as data.
//!
//! Values are illustrative defaults of each regime's shape (threshold, whether
//! it binds, how much may or must be met with credits). Insert a replacement
//! `OffsetRuleTable` resource to use verified figures.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::legislation::normalize_jurisdiction;

/// Share of emissions that must be offset once emissions reach `min_emissions`.
/// `percentage: None` means the regime binds but sets no numeric offset share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetTier {
    pub min_emissions: f64,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetRule {
    /// Canonical jurisdiction name.
    pub jurisdiction: String,
    pub threshold: f64,
    pub mandatory: bool,
    /// Ascending by `min_emissions`.
    pub tiers: Vec<OffsetTier>,
    pub mandatory_credit_types: Vec<String>,
    pub voluntary_credit_types: Vec<String>,
}

impl OffsetRule {
    /// Highest tier whose floor `emissions` reaches.
    pub fn tier_for(&self, emissions: f64) -> Option<&OffsetTier> {
        self.tiers
            .iter()
            .filter(|t| emissions >= t.min_emissions)
            .max_by(|a, b| a.min_emissions.total_cmp(&b.min_emissions))
    }
}

fn types(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn tier(min_emissions: f64, percentage: Option<f64>) -> OffsetTier {
    OffsetTier {
        min_emissions,
        percentage,
    }
}

fn rule(
    jurisdiction: &str,
    threshold: f64,
    mandatory: bool,
    tiers: Vec<OffsetTier>,
    mandatory_types: &[&str],
    voluntary_types: &[&str],
) -> OffsetRule {
    OffsetRule {
        jurisdiction: jurisdiction.to_string(),
        threshold,
        mandatory,
        tiers,
        mandatory_credit_types: types(mandatory_types),
        voluntary_credit_types: types(voluntary_types),
    }
}

/// Voluntary credit types accepted where no rule names its own.
pub const DEFAULT_VOLUNTARY_CREDIT_TYPES: &[&str] = &["VCU", "GS-VER"];

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetRuleTable {
    pub rules: Vec<OffsetRule>,
    pub default_voluntary_credit_types: Vec<String>,
}

impl Default for OffsetRuleTable {
    fn default() -> Self {
        Self {
            rules: vec![
                rule(
                    "Australia",
                    100_000.0,
                    true,
                    vec![tier(100_000.0, Some(4.9))],
                    &["ACCU", "SMC"],
                    &["ACCU", "VCU", "GS-VER"],
                ),
                rule(
                    "European Union",
                    25_000.0,
                    true,
                    vec![tier(25_000.0, None)],
                    &["EUA"],
                    &["VCU", "GS-VER"],
                ),
                rule(
                    "United Kingdom",
                    25_000.0,
                    true,
                    vec![tier(25_000.0, None)],
                    &["UKA"],
                    &["WCU", "PIU", "VCU", "GS-VER"],
                ),
                rule(
                    "California",
                    25_000.0,
                    true,
                    vec![tier(25_000.0, Some(4.0))],
                    &["CCA", "ARB-OFFSET"],
                    &["VCU", "GS-VER", "CAR"],
                ),
                rule(
                    "Canada",
                    50_000.0,
                    true,
                    vec![tier(50_000.0, Some(2.0)), tier(250_000.0, Some(5.0))],
                    &["FOC", "SPC"],
                    &["VCU", "GS-VER"],
                ),
                rule(
                    "Singapore",
                    25_000.0,
                    true,
                    vec![tier(25_000.0, Some(5.0))],
                    &["ICC"],
                    &["VCU", "GS-VER"],
                ),
                rule(
                    "China",
                    26_000.0,
                    true,
                    vec![tier(26_000.0, Some(5.0))],
                    &["CEA", "CCER"],
                    &["CCER", "VCU", "GS-VER"],
                ),
                rule(
                    "United States",
                    25_000.0,
                    false,
                    Vec::new(),
                    &[],
                    &["VCU", "GS-VER", "CAR", "ACR"],
                ),
            ],
            default_voluntary_credit_types: types(DEFAULT_VOLUNTARY_CREDIT_TYPES),
        }
    }
}

impl OffsetRuleTable {
    /// Rule for a jurisdiction, matched after normalization.
    pub fn rule_for(&self, jurisdiction: &str) -> Option<&OffsetRule> {
        let canonical = normalize_jurisdiction(jurisdiction);
        self.rules.iter().find(|r| r.jurisdiction == canonical)
    }

    /// Add or replace the rule for `rule.jurisdiction`.
    pub fn upsert(&mut self, rule: OffsetRule) {
        match self
            .rules
            .iter_mut()
            .find(|r| r.jurisdiction == rule.jurisdiction)
        {
            Some(slot) => *slot = rule,
            None => self.rules.push(rule),
        }
    }
}
