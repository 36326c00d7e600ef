//! Raw activity entries and their coercion into non-negative quantities.
//!
//! Users type activity data into forms, so entries arrive as text (or as JSON
//! numbers from older scenario files). Anything that is not a finite,
//! non-negative number becomes `0.0`. Bad input degrades to a zero
//! contribution instead of failing the calculation.

use std::collections::BTreeMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// One activity quantity, in the unit of its source (kWh, litres, km, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ActivityInput {
    pub id: String,
    pub quantity: f64,
}

impl ActivityInput {
    /// Build an input, clamping the quantity to a finite value `>= 0`.
    pub fn new(id: impl Into<String>, quantity: f64) -> Self {
        Self {
            id: id.into(),
            quantity: sanitize_quantity(quantity),
        }
    }

    /// Build an input from raw form text.
    pub fn from_raw(id: impl Into<String>, raw: &str) -> Self {
        Self {
            id: id.into(),
            quantity: coerce_quantity(raw),
        }
    }
}

/// Parse raw text into a quantity. Empty, non-numeric, non-finite and negative
/// values all become `0.0`. Thousands separators (`1,200`) are tolerated.
pub fn coerce_quantity(raw: &str) -> f64 {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().map(sanitize_quantity).unwrap_or(0.0)
}

/// Coerce a loosely-typed JSON value (number, numeric string, anything else).
pub fn coerce_json_quantity(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(sanitize_quantity).unwrap_or(0.0),
        serde_json::Value::String(s) => coerce_quantity(s),
        _ => 0.0,
    }
}

/// Clamp to a finite value `>= 0`; anything else is `0.0`.
pub fn sanitize_quantity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// The raw activity entries of a session, keyed by source id.
///
/// Raw text is kept verbatim so a reloaded scenario shows exactly what the
/// user typed; quantities are derived on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ActivityInputs {
    raw: BTreeMap<String, String>,
}

impl ActivityInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) the raw entry for a source. An empty string removes it.
    pub fn set_raw(&mut self, id: impl Into<String>, raw: impl Into<String>) {
        let id = id.into();
        let raw = raw.into();
        if raw.trim().is_empty() {
            self.raw.remove(&id);
        } else {
            self.raw.insert(id, raw);
        }
    }

    /// Convenience for numeric entry.
    pub fn set_quantity(&mut self, id: impl Into<String>, quantity: f64) {
        self.set_raw(id, format!("{quantity}"));
    }

    pub fn raw(&self, id: &str) -> Option<&str> {
        self.raw.get(id).map(String::as_str)
    }

    pub fn quantity(&self, id: &str) -> f64 {
        self.raw(id).map(coerce_quantity).unwrap_or(0.0)
    }

    pub fn raw_entries(&self) -> &BTreeMap<String, String> {
        &self.raw
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Coerced inputs in id order.
    pub fn to_activity_inputs(&self) -> Vec<ActivityInput> {
        self.raw
            .iter()
            .map(|(id, raw)| ActivityInput::from_raw(id.clone(), raw))
            .collect()
    }
}

impl FromIterator<(String, String)> for ActivityInputs {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut inputs = Self::default();
        for (id, raw) in iter {
            inputs.set_raw(id, raw);
        }
        inputs
    }
}
