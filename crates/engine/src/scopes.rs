//! Scope aggregation: resolved kg CO2e contributions -> Scope 1/2/3 tonnes.
//!
//! Pure and deterministic, so it is safe to re-run on every input change.

use std::cmp::Ordering;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{KG_PER_TONNE, SCOPE_SUM_TOLERANCE};
use crate::factors::SourceContribution;
use crate::sources::{find_source, Scope};

/// Scope totals in tonnes CO2e. `total` always equals the sum of the scopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ScopeEmissions {
    pub scope1: f64,
    pub scope2: f64,
    pub scope3: f64,
    pub total: f64,
}

impl ScopeEmissions {
    /// Build from scope values, deriving the total.
    pub fn new(scope1: f64, scope2: f64, scope3: f64) -> Self {
        Self {
            scope1,
            scope2,
            scope3,
            total: scope1 + scope2 + scope3,
        }
    }

    pub fn get(&self, scope: Scope) -> f64 {
        match scope {
            Scope::Scope1 => self.scope1,
            Scope::Scope2 => self.scope2,
            Scope::Scope3 => self.scope3,
        }
    }

    /// Whether `total` matches the scope sum within tolerance.
    pub fn is_consistent(&self) -> bool {
        (self.total - (self.scope1 + self.scope2 + self.scope3)).abs() <= SCOPE_SUM_TOLERANCE
    }

    /// Share of the total held by `scope`, in percent. Zero when the total is zero.
    pub fn share_percent(&self, scope: Scope) -> f64 {
        percent_of(self.get(scope), self.total)
    }
}

/// `part / whole * 100`, or `0` when `whole` is not positive.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn kg_to_tonnes(kg: f64) -> f64 {
    kg / KG_PER_TONNE
}

/// Sum contributions into scope totals (tonnes).
pub fn aggregate(contributions: &[SourceContribution]) -> ScopeEmissions {
    let mut kg = [0.0_f64; 3];
    for c in contributions {
        let idx = match c.scope {
            Scope::Scope1 => 0,
            Scope::Scope2 => 1,
            Scope::Scope3 => 2,
        };
        kg[idx] += c.kg_co2e;
    }
    ScopeEmissions::new(kg_to_tonnes(kg[0]), kg_to_tonnes(kg[1]), kg_to_tonnes(kg[2]))
}

/// One row of the per-source breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub source_id: String,
    pub label: String,
    pub scope: Scope,
    pub tonnes: f64,
    /// Percent of the inventory total; 0 when the total is 0.
    pub share_of_total: f64,
}

/// Per-source tonnes, largest first (ties by id). Duplicate ids are merged.
pub fn breakdown(contributions: &[SourceContribution]) -> Vec<SourceBreakdown> {
    let total_tonnes = aggregate(contributions).total;
    let mut rows: Vec<SourceBreakdown> = Vec::new();

    for c in contributions {
        let tonnes = kg_to_tonnes(c.kg_co2e);
        if let Some(row) = rows.iter_mut().find(|r| r.source_id == c.source_id) {
            row.tonnes += tonnes;
            continue;
        }
        let label = find_source(&c.source_id)
            .map(|s| s.label.to_string())
            .unwrap_or_else(|| c.source_id.clone());
        rows.push(SourceBreakdown {
            source_id: c.source_id.clone(),
            label,
            scope: c.scope,
            tonnes,
            share_of_total: 0.0,
        });
    }

    for row in &mut rows {
        row.share_of_total = percent_of(row.tonnes, total_tonnes);
    }

    rows.sort_by(|a, b| {
        b.tonnes
            .partial_cmp(&a.tonnes)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.source_id.cmp(&b.source_id))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityInput;
    use crate::factors::{resolve, FactorCatalog, FactorOrigin};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn contribution(id: &str, scope: Scope, kg: f64) -> SourceContribution {
        SourceContribution {
            source_id: id.to_string(),
            scope,
            quantity: kg,
            factor: 1.0,
            origin: FactorOrigin::Generic,
            kg_co2e: kg,
        }
    }

    #[test]
    fn test_aggregate_converts_kg_to_tonnes() {
        let contributions = vec![
            contribution("coal", Scope::Scope1, 2000.0),
            contribution("electricity", Scope::Scope2, 500.0),
            contribution("air_travel", Scope::Scope3, 1500.0),
        ];
        let totals = aggregate(&contributions);
        assert_eq!(totals.scope1, 2.0);
        assert_eq!(totals.scope2, 0.5);
        assert_eq!(totals.scope3, 1.5);
        assert_eq!(totals.total, 4.0);
        assert!(totals.is_consistent());
    }

    #[test]
    fn test_all_zero_inputs_give_zero_everywhere() {
        let inputs: Vec<ActivityInput> = crate::sources::SOURCE_TABLE
            .iter()
            .map(|s| ActivityInput::new(s.id, 0.0))
            .collect();
        let contributions = resolve(&inputs, &FactorCatalog::builtin(), "AU");
        let totals = aggregate(&contributions);
        assert_eq!(totals, ScopeEmissions::default());
        for scope in Scope::all() {
            assert_eq!(totals.share_percent(scope), 0.0);
        }
        for row in breakdown(&contributions) {
            assert_eq!(row.share_of_total, 0.0);
            assert!(row.share_of_total.is_finite());
        }
    }

    #[test]
    fn test_breakdown_sorted_descending() {
        let contributions = vec![
            contribution("coal", Scope::Scope1, 100.0),
            contribution("electricity", Scope::Scope2, 900.0),
            contribution("air_travel", Scope::Scope3, 400.0),
        ];
        let rows = breakdown(&contributions);
        let ids: Vec<&str> = rows.iter().map(|r| r.source_id.as_str()).collect();
        assert_eq!(ids, vec!["electricity", "air_travel", "coal"]);
        assert!((rows[0].share_of_total - 900.0 / 1400.0 * 100.0).abs() < 1e-9);
        assert_eq!(rows[0].label, "Grid Electricity");
    }

    #[test]
    fn test_breakdown_merges_duplicate_sources() {
        let contributions = vec![
            contribution("coal", Scope::Scope1, 100.0),
            contribution("coal", Scope::Scope1, 300.0),
        ];
        let rows = breakdown(&contributions);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].tonnes - 0.4).abs() < 1e-12);
        assert!((rows[0].share_of_total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_scope_sum_invariant_random_inputs() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let catalog = FactorCatalog::builtin();
        for _ in 0..200 {
            let inputs: Vec<ActivityInput> = crate::sources::SOURCE_TABLE
                .iter()
                .map(|s| ActivityInput::new(s.id, rng.gen_range(0.0..1_000_000.0)))
                .collect();
            let totals = aggregate(&resolve(&inputs, &catalog, "US"));
            assert!(totals.is_consistent(), "total drifted: {:?}", totals);
        }
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let inputs = vec![
            ActivityInput::new("natural_gas", 1234.5),
            ActivityInput::new("electricity", 98765.0),
            ActivityInput::new("waste_landfill", 4321.0),
        ];
        let catalog = FactorCatalog::builtin();
        let first = aggregate(&resolve(&inputs, &catalog, "GB"));
        let second = aggregate(&resolve(&inputs, &catalog, "GB"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_increasing_one_input_never_decreases_its_scope() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let catalog = FactorCatalog::builtin();
        for source in crate::sources::SOURCE_TABLE {
            let base: Vec<ActivityInput> = crate::sources::SOURCE_TABLE
                .iter()
                .map(|s| ActivityInput::new(s.id, rng.gen_range(0.0..10_000.0)))
                .collect();
            let mut bumped = base.clone();
            for input in &mut bumped {
                if input.id == source.id {
                    input.quantity += rng.gen_range(0.0..10_000.0);
                }
            }
            let before = aggregate(&resolve(&base, &catalog, "AU")).get(source.scope());
            let after = aggregate(&resolve(&bumped, &catalog, "AU")).get(source.scope());
            assert!(after >= before, "{}: {} -> {}", source.id, before, after);
        }
    }
}
