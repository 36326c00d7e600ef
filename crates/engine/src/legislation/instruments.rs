//! Legislative instruments and their applicability predicates.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::jurisdiction::normalize_jurisdiction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Total tonnes CO2e.
    Emissions,
    /// Annual revenue in local currency.
    Revenue,
    Employees,
}

impl Metric {
    fn describe(self, value: f64) -> String {
        match self {
            Metric::Emissions => format!("emissions of {} tCO2e", group_thousands(value)),
            Metric::Revenue => format!("annual revenue of {}", group_thousands(value)),
            Metric::Employees => format!("headcount of {}", group_thousands(value)),
        }
    }
}

/// Format a non-negative amount with thousands separators, no decimals.
pub fn group_thousands(value: f64) -> String {
    let rounded = if value.is_finite() { value.max(0.0).round() } else { 0.0 };
    let digits = format!("{rounded:.0}");
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One numeric condition. Met when the metric is at or above the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegislationThreshold {
    pub jurisdiction: String,
    pub metric: Metric,
    pub threshold_value: f64,
    pub mandatory: bool,
}

/// Organization figures the predicates are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrganizationFacts {
    pub revenue: f64,
    pub employees: f64,
    pub emissions: f64,
}

impl OrganizationFacts {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Emissions => self.emissions,
            Metric::Revenue => self.revenue,
            Metric::Employees => self.employees,
        }
    }
}

impl LegislationThreshold {
    pub fn is_met(&self, facts: &OrganizationFacts) -> bool {
        facts.value(self.metric) >= self.threshold_value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    Any,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: String,
    pub name: String,
    /// Canonical jurisdiction name.
    pub jurisdiction: String,
    pub conditions: Vec<LegislationThreshold>,
    pub combinator: Combinator,
    pub requires_scope3: bool,
    pub requires_reduction_targets: bool,
}

impl Instrument {
    /// Conditions currently met. Empty when the predicate is false.
    pub fn met_conditions(&self, facts: &OrganizationFacts) -> Vec<&LegislationThreshold> {
        let met: Vec<&LegislationThreshold> =
            self.conditions.iter().filter(|c| c.is_met(facts)).collect();
        let applies = match self.combinator {
            Combinator::Any => !met.is_empty(),
            Combinator::All => met.len() == self.conditions.len() && !met.is_empty(),
        };
        if applies {
            met
        } else {
            Vec::new()
        }
    }

    pub fn applies(&self, facts: &OrganizationFacts) -> bool {
        !self.met_conditions(facts).is_empty()
    }

    pub fn is_mandatory(&self) -> bool {
        self.conditions.iter().any(|c| c.mandatory)
    }
}

/// An instrument that applies, with the reason it does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicableInstrument {
    pub instrument: Instrument,
    pub reason: String,
}

fn reason_for(instrument: &Instrument, met: &[&LegislationThreshold], facts: &OrganizationFacts) -> String {
    let parts: Vec<String> = met
        .iter()
        .map(|c| {
            format!(
                "{} meets the {} threshold",
                c.metric.describe(facts.value(c.metric)),
                group_thousands(c.threshold_value)
            )
        })
        .collect();
    let joiner = match instrument.combinator {
        Combinator::Any => "; ",
        Combinator::All => " and ",
    };
    capitalize(&parts.join(joiner))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn condition(jurisdiction: &str, metric: Metric, threshold_value: f64) -> LegislationThreshold {
    LegislationThreshold {
        jurisdiction: jurisdiction.to_string(),
        metric,
        threshold_value,
        mandatory: true,
    }
}

struct InstrumentSpec<'a> {
    id: &'a str,
    name: &'a str,
    jurisdiction: &'a str,
    conditions: &'a [(Metric, f64)],
    combinator: Combinator,
    requires_scope3: bool,
    requires_reduction_targets: bool,
}

impl InstrumentSpec<'_> {
    fn build(&self) -> Instrument {
        Instrument {
            id: self.id.to_string(),
            name: self.name.to_string(),
            jurisdiction: self.jurisdiction.to_string(),
            conditions: self
                .conditions
                .iter()
                .map(|(metric, value)| condition(self.jurisdiction, *metric, *value))
                .collect(),
            combinator: self.combinator,
            requires_scope3: self.requires_scope3,
            requires_reduction_targets: self.requires_reduction_targets,
        }
    }
}

const DEFAULT_INSTRUMENTS: &[InstrumentSpec<'static>] = &[
    InstrumentSpec {
        id: "au_nger",
        name: "National Greenhouse and Energy Reporting (NGER)",
        jurisdiction: "Australia",
        conditions: &[(Metric::Emissions, 50_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "au_safeguard",
        name: "Safeguard Mechanism",
        jurisdiction: "Australia",
        conditions: &[(Metric::Emissions, 100_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: true,
    },
    InstrumentSpec {
        id: "au_aasb_s2",
        name: "AASB S2 Climate-related Disclosures",
        jurisdiction: "Australia",
        conditions: &[
            (Metric::Revenue, 500_000_000.0),
            (Metric::Employees, 500.0),
            (Metric::Emissions, 50_000.0),
        ],
        combinator: Combinator::Any,
        requires_scope3: true,
        requires_reduction_targets: true,
    },
    InstrumentSpec {
        id: "eu_csrd",
        name: "Corporate Sustainability Reporting Directive (CSRD)",
        jurisdiction: "European Union",
        conditions: &[(Metric::Employees, 250.0), (Metric::Revenue, 50_000_000.0)],
        combinator: Combinator::Any,
        requires_scope3: true,
        requires_reduction_targets: true,
    },
    InstrumentSpec {
        id: "eu_ets",
        name: "EU Emissions Trading System",
        jurisdiction: "European Union",
        conditions: &[(Metric::Emissions, 25_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "uk_secr",
        name: "Streamlined Energy and Carbon Reporting (SECR)",
        jurisdiction: "United Kingdom",
        conditions: &[(Metric::Employees, 250.0), (Metric::Revenue, 36_000_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "uk_ets",
        name: "UK Emissions Trading Scheme",
        jurisdiction: "United Kingdom",
        conditions: &[(Metric::Emissions, 25_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "ca_sb253",
        name: "Climate Corporate Data Accountability Act (SB 253)",
        jurisdiction: "California",
        conditions: &[(Metric::Revenue, 1_000_000_000.0)],
        combinator: Combinator::Any,
        requires_scope3: true,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "ca_sb261",
        name: "Climate-Related Financial Risk Act (SB 261)",
        jurisdiction: "California",
        conditions: &[(Metric::Revenue, 500_000_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "ca_cap_and_trade",
        name: "California Cap-and-Trade Program",
        jurisdiction: "California",
        conditions: &[(Metric::Emissions, 25_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "ca_epa_ghgrp",
        name: "EPA Greenhouse Gas Reporting Program",
        jurisdiction: "California",
        conditions: &[(Metric::Emissions, 25_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "us_epa_ghgrp",
        name: "EPA Greenhouse Gas Reporting Program",
        jurisdiction: "United States",
        conditions: &[(Metric::Emissions, 25_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "can_obps",
        name: "Output-Based Pricing System",
        jurisdiction: "Canada",
        conditions: &[(Metric::Emissions, 50_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: true,
    },
    InstrumentSpec {
        id: "can_ghgrp",
        name: "Greenhouse Gas Reporting Program (Canada)",
        jurisdiction: "Canada",
        conditions: &[(Metric::Emissions, 10_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "sg_carbon_pricing",
        name: "Carbon Pricing Act",
        jurisdiction: "Singapore",
        conditions: &[(Metric::Emissions, 25_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
    InstrumentSpec {
        id: "cn_national_ets",
        name: "National Emissions Trading Scheme",
        jurisdiction: "China",
        conditions: &[(Metric::Emissions, 26_000.0)],
        combinator: Combinator::Any,
        requires_scope3: false,
        requires_reduction_targets: false,
    },
];

/// Instruments per jurisdiction. Replace the resource to load a remote table.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegislationTable {
    pub instruments: Vec<Instrument>,
}

impl Default for LegislationTable {
    fn default() -> Self {
        Self {
            instruments: DEFAULT_INSTRUMENTS.iter().map(InstrumentSpec::build).collect(),
        }
    }
}

impl LegislationTable {
    pub fn empty() -> Self {
        Self {
            instruments: Vec::new(),
        }
    }

    /// Instruments for a jurisdiction, matched after normalization.
    pub fn instruments_for(&self, jurisdiction: &str) -> impl Iterator<Item = &Instrument> {
        let canonical = normalize_jurisdiction(jurisdiction);
        self.instruments
            .iter()
            .filter(move |i| i.jurisdiction == canonical)
    }

    pub fn find(&self, id: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == id)
    }
}

/// Instruments in `jurisdiction` whose predicate holds, each with a reason.
///
/// A jurisdiction with no instruments yields an empty list and a warning.
pub fn applicable_legislation(
    table: &LegislationTable,
    jurisdiction: &str,
    revenue: f64,
    employees: f64,
    emissions: f64,
) -> Vec<ApplicableInstrument> {
    let canonical = normalize_jurisdiction(jurisdiction);
    let candidates: Vec<&Instrument> = table.instruments_for(&canonical).collect();
    if candidates.is_empty() {
        warn!(
            "No legislation known for jurisdiction '{}' (from '{}')",
            canonical, jurisdiction
        );
        return Vec::new();
    }

    let facts = OrganizationFacts {
        revenue,
        employees,
        emissions,
    };
    candidates
        .into_iter()
        .filter_map(|instrument| {
            let met = instrument.met_conditions(&facts);
            if met.is_empty() {
                return None;
            }
            Some(ApplicableInstrument {
                reason: reason_for(instrument, &met, &facts),
                instrument: instrument.clone(),
            })
        })
        .collect()
}
