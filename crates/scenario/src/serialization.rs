// ---------------------------------------------------------------------------
// serialization – CalculationSession <-> ScenarioSnapshot
// ---------------------------------------------------------------------------
//
// `serialize` is pure: it reads the session and the active factor catalog and
// records the derived emissions next to the inputs. `deserialize` accepts any
// JSON object, upgrades it through the migration chain and fills every
// missing field with its default. The stored emissions are informational; the
// engine recomputes them after a load.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;

use engine::activity::{coerce_json_quantity, ActivityInputs};
use engine::config::{DEFAULT_REDUCTION_TARGET, DEFAULT_REGION, MAX_HORIZON_YEARS};
use engine::credits::{find_project, CarbonCreditSelection, CreditProject};
use engine::factors::{contributions_by_source, resolve, FactorCatalog};
use engine::organization::OrganizationProfile;
use engine::reduction::{ReductionStrategy, StrategyFields};
use engine::scopes::{aggregate, kg_to_tonnes};
use engine::session::CalculationSession;

use crate::scenario_error::ScenarioError;
use crate::scenario_migrate::migrate_snapshot;
use crate::scenario_types::{
    SavedCreditProject, SavedCreditSelection, SavedEmissions, SavedOrganization, SavedStrategy,
    ScenarioSnapshot, CURRENT_SCENARIO_VERSION,
};

// ---------------------------------------------------------------------------
// Session -> snapshot
// ---------------------------------------------------------------------------

/// Capture `session` as a current-version snapshot.
pub fn serialize(session: &CalculationSession, catalog: &FactorCatalog) -> ScenarioSnapshot {
    let contributions = resolve(
        &session.inputs.to_activity_inputs(),
        catalog,
        &session.region,
    );
    let scopes = aggregate(&contributions);
    let emission_values = contributions_by_source(&contributions)
        .into_iter()
        .map(|(id, kg)| (id, kg_to_tonnes(kg)))
        .collect();

    let raw_inputs = session
        .inputs
        .raw_entries()
        .iter()
        .map(|(id, raw)| (id.clone(), Value::String(raw.clone())))
        .collect();

    ScenarioSnapshot {
        version: CURRENT_SCENARIO_VERSION,
        raw_inputs,
        emission_values,
        reduction_strategies: session.strategies.iter().map(save_strategy).collect(),
        reduction_target: session.reduction_target,
        active_section: session.active_section.clone(),
        emissions: SavedEmissions {
            scope1: scopes.scope1,
            scope2: scopes.scope2,
            scope3: scopes.scope3,
            total: scopes.total,
        },
        region: session.region.clone(),
        jurisdiction: session.jurisdiction.clone(),
        organization: save_organization(&session.organization),
        credit_selections: session
            .credit_selections
            .iter()
            .map(|s| SavedCreditSelection {
                project_id: s.project_id.clone(),
                selected_quantity: s.selected_quantity,
                price_per_tonne: s.price_per_tonne,
            })
            .collect(),
        credit_projects: session
            .credit_projects
            .iter()
            .map(|p| SavedCreditProject {
                id: p.id.clone(),
                name: p.name.clone(),
                credit_type: p.credit_type.clone(),
                available_credits: p.available_credits,
                price_per_tonne: p.price_per_tonne,
            })
            .collect(),
        horizon_years: session.horizon_years,
    }
}

/// Text of a serde unit variant, e.g. `Timeframe::Medium` -> `"medium"`.
fn enum_text<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(text)) => text,
        _ => String::new(),
    }
}

fn save_strategy(strategy: &ReductionStrategy) -> SavedStrategy {
    let fields = strategy.fields();
    SavedStrategy {
        id: strategy.id().to_string(),
        category: fields.category.clone(),
        reduction_type: enum_text(&fields.reduction_type),
        reduction_potential: fields.reduction_potential,
        reduction_tonnes: fields.reduction_tonnes,
        implementation_cost: enum_text(&fields.implementation_cost),
        timeframe: enum_text(&fields.timeframe),
        implementation_year: Some(fields.implementation_year),
        full_realization_year: Some(strategy.full_realization_year()),
        yearly_reductions: strategy.yearly_reductions().clone(),
        is_confirmed: strategy.is_confirmed(),
    }
}

fn save_organization(org: &OrganizationProfile) -> SavedOrganization {
    SavedOrganization {
        organization_type: org.organization_type.clone(),
        employee_count: org.employee_count,
        facility_count: org.facility_count,
        annual_revenue: org.annual_revenue,
        industry_type: org.industry_type.clone(),
        reporting_year: org.reporting_year,
        location: org.location.clone(),
    }
}

// ---------------------------------------------------------------------------
// Snapshot -> session
// ---------------------------------------------------------------------------

/// Drop `null` members of every object so they take their defaults.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Upgrade and type a raw JSON payload.
///
/// # Errors
///
/// `Malformed` when the top level is not an object, `VersionMismatch` for a
/// snapshot from a newer build, `MigrationFailed` or `Json` when a field has
/// an impossible shape.
pub fn parse_snapshot(value: Value) -> Result<ScenarioSnapshot, ScenarioError> {
    let Value::Object(mut map) = value else {
        return Err(ScenarioError::Malformed(
            "scenario snapshot must be a JSON object".to_string(),
        ));
    };
    map.values_mut().for_each(strip_nulls);
    map.retain(|_, v| !v.is_null());

    let report = migrate_snapshot(&mut map)?;
    if report.steps_applied > 0 {
        info!(
            "Migrated scenario v{} -> v{}: {}",
            report.original_version,
            report.final_version,
            report.step_descriptions.join(", ")
        );
    }
    Ok(serde_json::from_value(Value::Object(map))?)
}

/// Build a session from a raw JSON payload. `deserialize(&json!({}))` is a
/// default session.
pub fn deserialize(value: &Value) -> Result<CalculationSession, ScenarioError> {
    Ok(parse_snapshot(value.clone())?.into_session())
}

pub fn deserialize_str(json: &str) -> Result<CalculationSession, ScenarioError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(parse_snapshot(value)?.into_session())
}

/// Parse enum text stored in a snapshot; unknown text gives the default.
fn parse_enum<T: DeserializeOwned + Default>(field: &str, strategy_id: &str, text: &str) -> T {
    if text.is_empty() {
        return T::default();
    }
    serde_json::from_value(Value::String(text.trim().to_lowercase())).unwrap_or_else(|_| {
        warn!(
            "Scenario strategy '{}': unknown {} '{}', using default",
            strategy_id, field, text
        );
        T::default()
    })
}

/// Raw text for a stored input. Numbers and strings are kept verbatim; text
/// that does not read as a non-negative quantity is kept but counts as zero.
fn raw_input_text(id: &str, value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            warn!(
                "Scenario input '{}' has non-numeric value {}, dropping it",
                id, other
            );
            return None;
        }
    };
    if coerce_json_quantity(value) == 0.0 && !reads_as_zero(&text) {
        warn!("Scenario input '{}' value '{}' counts as 0", id, text);
    }
    Some(text)
}

fn reads_as_zero(text: &str) -> bool {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned.is_empty() || cleaned.parse::<f64>() == Ok(0.0)
}

/// Check saved selections against the loaded projects: unknown projects and
/// empty selections are dropped, oversized ones are trimmed to what the
/// project has available.
fn restore_selections(
    saved: Vec<SavedCreditSelection>,
    projects: &[CreditProject],
) -> Vec<CarbonCreditSelection> {
    let mut selections: Vec<CarbonCreditSelection> = Vec::with_capacity(saved.len());
    for s in saved {
        if selections.iter().any(|kept| kept.project_id == s.project_id) {
            warn!("Scenario has duplicate selection for '{}', keeping the first", s.project_id);
            continue;
        }
        let Some(project) = find_project(projects, &s.project_id) else {
            warn!("Scenario selects unknown credit project '{}', dropping it", s.project_id);
            continue;
        };
        let quantity = s.selected_quantity.min(project.available_credits);
        if quantity == 0 {
            warn!("Scenario selection for '{}' is empty, dropping it", s.project_id);
            continue;
        }
        if quantity != s.selected_quantity {
            warn!(
                "Scenario selection for '{}' trimmed from {} to {} available credits",
                s.project_id, s.selected_quantity, quantity
            );
        }
        selections.push(CarbonCreditSelection {
            project_id: s.project_id,
            selected_quantity: quantity,
            price_per_tonne: s.price_per_tonne,
        });
    }
    selections
}

impl SavedStrategy {
    fn restore(&self, default_year: i32) -> ReductionStrategy {
        let fields = StrategyFields {
            category: self.category.clone(),
            reduction_type: parse_enum("reductionType", &self.id, &self.reduction_type),
            reduction_potential: self.reduction_potential,
            reduction_tonnes: self.reduction_tonnes,
            implementation_cost: parse_enum("implementationCost", &self.id, &self.implementation_cost),
            timeframe: parse_enum("timeframe", &self.id, &self.timeframe),
            implementation_year: self.implementation_year.unwrap_or(default_year),
        };
        ReductionStrategy::restore(
            self.id.clone(),
            fields,
            self.is_confirmed,
            self.yearly_reductions.clone(),
        )
    }
}

impl ScenarioSnapshot {
    /// Build a fresh session (revision 0, dirty) from the snapshot.
    pub fn into_session(self) -> CalculationSession {
        let mut organization = OrganizationProfile {
            organization_type: self.organization.organization_type,
            employee_count: self.organization.employee_count,
            facility_count: self.organization.facility_count,
            annual_revenue: self.organization.annual_revenue,
            industry_type: self.organization.industry_type,
            reporting_year: self.organization.reporting_year,
            location: self.organization.location,
        };
        if let Some(year) = organization.clamp_reporting_year() {
            warn!(
                "Scenario reporting year {} out of range, clamped to {}",
                year,
                organization.start_year()
            );
        }
        let start_year = organization.start_year();

        let inputs: ActivityInputs = self
            .raw_inputs
            .iter()
            .filter_map(|(id, value)| raw_input_text(id, value).map(|raw| (id.clone(), raw)))
            .collect();

        let mut strategies: Vec<ReductionStrategy> = Vec::with_capacity(self.reduction_strategies.len());
        for saved in &self.reduction_strategies {
            if strategies.iter().any(|s| s.id() == saved.id) {
                warn!("Scenario has duplicate strategy '{}', keeping the first", saved.id);
                continue;
            }
            strategies.push(saved.restore(start_year));
        }

        let reduction_target = if self.reduction_target.is_finite() {
            self.reduction_target.clamp(0.0, 100.0)
        } else {
            DEFAULT_REDUCTION_TARGET
        };

        let credit_projects: Vec<CreditProject> = self
            .credit_projects
            .into_iter()
            .map(|p| CreditProject {
                id: p.id,
                name: p.name,
                credit_type: p.credit_type,
                available_credits: p.available_credits,
                price_per_tonne: p.price_per_tonne,
            })
            .collect();
        let credit_selections = restore_selections(self.credit_selections, &credit_projects);

        let region = match self.region.trim() {
            "" => DEFAULT_REGION.to_string(),
            code => code.to_uppercase(),
        };

        CalculationSession {
            revision: 0,
            dirty: true,
            region,
            jurisdiction: self.jurisdiction,
            inputs,
            organization,
            strategies,
            credit_selections,
            credit_projects,
            reduction_target,
            horizon_years: self.horizon_years.clamp(1, MAX_HORIZON_YEARS),
            active_section: self.active_section,
        }
    }
}

