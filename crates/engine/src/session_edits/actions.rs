use serde::{Deserialize, Serialize};

use crate::activity::{coerce_quantity, sanitize_quantity};
use crate::credits::CreditProject;
use crate::organization::OrganizationProfile;
use crate::reduction::StrategyFields;

/// Raw activity value as typed: a JSON number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Text stored in the session's raw inputs.
    pub fn as_raw(&self) -> String {
        match self {
            RawValue::Number(n) => format!("{n}"),
            RawValue::Text(s) => s.clone(),
        }
    }

    pub fn quantity(&self) -> f64 {
        match self {
            RawValue::Number(n) => sanitize_quantity(*n),
            RawValue::Text(s) => coerce_quantity(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum SessionEdit {
    SetActivity {
        id: String,
        value: RawValue,
    },
    ClearActivity {
        id: String,
    },
    ClearAllActivities,
    SetRegion {
        region: String,
    },
    SetJurisdiction {
        jurisdiction: String,
    },
    UpdateOrganization {
        organization: OrganizationProfile,
    },
    SetReductionTarget {
        percent: f64,
    },
    SetHorizon {
        years: u32,
    },
    SetActiveSection {
        section: String,
    },
    AddStrategy {
        id: String,
        fields: StrategyFields,
    },
    UpdateStrategy {
        id: String,
        fields: StrategyFields,
    },
    RemoveStrategy {
        id: String,
    },
    ConfirmStrategy {
        id: String,
    },
    ReopenStrategy {
        id: String,
    },
    AddCreditProject {
        project: CreditProject,
    },
    SelectCredits {
        project_id: String,
        quantity: u64,
    },
    RemoveCredits {
        project_id: String,
    },
}
