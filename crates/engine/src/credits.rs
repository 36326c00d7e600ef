//! Carbon-credit supply (`CreditProject`) and the user's selections.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A project offering credits of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct CreditProject {
    pub id: String,
    pub name: String,
    /// Credit-type id matched against jurisdiction lists (e.g. `ACCU`, `VCU`).
    pub credit_type: String,
    pub available_credits: u64,
    #[serde(default)]
    pub price_per_tonne: Option<f64>,
}

/// Credits the user intends to retire from one project. One credit is one tonne.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct CarbonCreditSelection {
    pub project_id: String,
    pub selected_quantity: u64,
    #[serde(default)]
    pub price_per_tonne: Option<f64>,
}

/// Why a selection was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRejected {
    UnknownProject(String),
    QuantityOutOfRange { requested: u64, available: u64 },
}

pub fn find_project<'a>(projects: &'a [CreditProject], id: &str) -> Option<&'a CreditProject> {
    projects.iter().find(|p| p.id == id)
}

/// Validate and insert a selection. Selecting the same project again replaces
/// the earlier selection. The price defaults to the project's price.
pub fn add_selection(
    selections: &mut Vec<CarbonCreditSelection>,
    projects: &[CreditProject],
    project_id: &str,
    quantity: u64,
) -> Result<(), SelectionRejected> {
    let project = find_project(projects, project_id)
        .ok_or_else(|| SelectionRejected::UnknownProject(project_id.to_string()))?;
    if quantity < 1 || quantity > project.available_credits {
        return Err(SelectionRejected::QuantityOutOfRange {
            requested: quantity,
            available: project.available_credits,
        });
    }
    let selection = CarbonCreditSelection {
        project_id: project.id.clone(),
        selected_quantity: quantity,
        price_per_tonne: project.price_per_tonne,
    };
    match selections.iter_mut().find(|s| s.project_id == project_id) {
        Some(slot) => *slot = selection,
        None => selections.push(selection),
    }
    Ok(())
}

/// Remove the selection for `project_id`. Returns whether one existed.
pub fn remove_selection(selections: &mut Vec<CarbonCreditSelection>, project_id: &str) -> bool {
    let before = selections.len();
    selections.retain(|s| s.project_id != project_id);
    selections.len() != before
}

/// Total tonnes selected.
pub fn total_credits(selections: &[CarbonCreditSelection]) -> f64 {
    selections.iter().map(|s| s.selected_quantity as f64).sum()
}

/// Total spend for selections that carry a price.
pub fn total_spend(selections: &[CarbonCreditSelection]) -> f64 {
    selections
        .iter()
        .filter_map(|s| s.price_per_tonne.map(|p| p.max(0.0) * s.selected_quantity as f64))
        .sum()
}

/// Credit type of a selection, if its project is known.
pub fn selection_credit_type<'a>(
    selection: &CarbonCreditSelection,
    projects: &'a [CreditProject],
) -> Option<&'a str> {
    find_project(projects, &selection.project_id).map(|p| p.credit_type.as_str())
}
