//! Dashboard configuration.
//!
//! Built once (from `Default` or a JSON file) and handed to the
//! [`Coordinator`](crate::Coordinator), which only ever reads it.

use fsd_core::{Attribute, SpatialUnit};
use serde::{Deserialize, Serialize};

use crate::reducer::Measure;

/// One entry of the spatial strata selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialStratum {
    pub unit: SpatialUnit,
    pub label: String,
}

impl From<SpatialUnit> for SpatialStratum {
    fn from(unit: SpatialUnit) -> Self {
        SpatialStratum {
            unit,
            label: unit.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Breakdown field that sizes map markers.
    pub response_var: Measure,
    /// Measure summed for checkbox panel counts.
    pub checkbox_measure: Measure,
    /// Attributes that get a checkbox panel (and a registry entry).
    pub filter_keys: Vec<Attribute>,
    /// Spatial units offered on the map; each gets a breakdown group.
    pub strata: Vec<SpatialStratum>,
    pub initial_unit: SpatialUnit,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            response_var: Measure::Yreq,
            checkbox_measure: Measure::Events,
            filter_keys: Attribute::ALL
                .into_iter()
                .filter(|a| !matches!(a, Attribute::Grid10 | Attribute::Geom))
                .collect(),
            strata: SpatialUnit::ALL.into_iter().map(SpatialStratum::from).collect(),
            initial_unit: SpatialUnit::Lake,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<DashboardConfig, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn has_unit(&self, unit: SpatialUnit) -> bool {
        self.strata.iter().any(|s| s.unit == unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.filter_keys.len(), 12);
        assert!(!config.filter_keys.contains(&Attribute::Grid10));
        assert_eq!(config.strata.len(), 6);
        assert_eq!(config.response_var, Measure::Yreq);
        assert_eq!(config.checkbox_measure, Measure::Events);
    }

    #[test]
    fn test_partial_json_config() {
        let config = DashboardConfig::from_json(
            r#"{"response_var": "total", "strata": [{"unit": "lake", "label": "Lake"}, {"unit": "mu", "label": "MU"}], "initial_unit": "mu"}"#,
        )
        .unwrap();
        assert_eq!(config.response_var, Measure::Total);
        assert_eq!(config.checkbox_measure, Measure::Events);
        assert!(config.has_unit(SpatialUnit::ManagementUnit));
        assert!(!config.has_unit(SpatialUnit::Grid10));
        assert_eq!(config.initial_unit, SpatialUnit::ManagementUnit);
    }

    #[test]
    fn test_bad_unit_in_config() {
        assert!(DashboardConfig::from_json(r#"{"initial_unit": "basin"}"#).is_err());
    }
}
