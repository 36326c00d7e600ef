//! `OrganizationProfile`: the reporting entity's attributes.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{clamp_year, DEFAULT_START_YEAR};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct OrganizationProfile {
    #[serde(default)]
    pub organization_type: Option<String>,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default)]
    pub facility_count: u32,
    #[serde(default)]
    pub annual_revenue: f64,
    #[serde(default)]
    pub industry_type: Option<String>,
    #[serde(default)]
    pub reporting_year: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
}

/// `Some` with non-blank text.
pub fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl OrganizationProfile {
    /// First year of the projection horizon, within `MIN_YEAR..=MAX_YEAR`.
    pub fn start_year(&self) -> i32 {
        clamp_year(self.reporting_year.unwrap_or(DEFAULT_START_YEAR))
    }

    /// Clamp `reporting_year` in place. Returns the original year when it
    /// was out of range.
    pub fn clamp_reporting_year(&mut self) -> Option<i32> {
        let year = self.reporting_year?;
        let clamped = clamp_year(year);
        if clamped == year {
            return None;
        }
        self.reporting_year = Some(clamped);
        Some(year)
    }

    /// Revenue usable in threshold checks (finite, `>= 0`).
    pub fn revenue(&self) -> f64 {
        if self.annual_revenue.is_finite() {
            self.annual_revenue.max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_year_defaults() {
        let mut org = OrganizationProfile::default();
        assert_eq!(org.start_year(), DEFAULT_START_YEAR);
        org.reporting_year = Some(2030);
        assert_eq!(org.start_year(), 2030);
        org.reporting_year = Some(i32::MAX);
        assert_eq!(org.start_year(), crate::config::MAX_YEAR);
    }

    #[test]
    fn test_clamp_reporting_year() {
        let mut org = OrganizationProfile {
            reporting_year: Some(-40),
            ..Default::default()
        };
        assert_eq!(org.clamp_reporting_year(), Some(-40));
        assert_eq!(org.reporting_year, Some(crate::config::MIN_YEAR));
        assert_eq!(org.clamp_reporting_year(), None);
    }

    #[test]
    fn test_blank_strings_are_unset() {
        assert!(!is_set(&None));
        assert!(!is_set(&Some("   ".to_string())));
        assert!(is_set(&Some("Manufacturing".to_string())));
    }

    #[test]
    fn test_revenue_sanitized() {
        let org = OrganizationProfile {
            annual_revenue: f64::NAN,
            ..Default::default()
        };
        assert_eq!(org.revenue(), 0.0);
    }
}
