use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::spatial::SpatialUnit;

/// Marker positions for polygon-based spatial units.
///
/// Mirrors the `centroids.json` file shipped with the dashboard:
///
/// ```text
/// { "lake": { "HU": [-82.4, 44.8], ... }, "jurisdiction": { "hu_mi": [...] }, ... }
/// ```
///
/// Keys of the outer map are spatial unit names (see [`SpatialUnit::name`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centroids(HashMap<String, HashMap<String, [f64; 2]>>);

impl Centroids {
    pub fn from_json(json: &str) -> Result<Centroids, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Centroid of `key` for the given unit as (lon, lat).
    pub fn get(&self, unit: SpatialUnit, key: &str) -> Option<(f64, f64)> {
        self.0
            .get(unit.name())
            .and_then(|by_key| by_key.get(key))
            .map(|[lon, lat]| (*lon, *lat))
    }

    pub fn insert(&mut self, unit: SpatialUnit, key: &str, lon: f64, lat: f64) {
        self.0
            .entry(unit.name().to_string())
            .or_default()
            .insert(key.to_string(), [lon, lat]);
    }

    pub fn len(&self, unit: SpatialUnit) -> usize {
        self.0.get(unit.name()).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroids_from_json() {
        let centroids = Centroids::from_json(
            r#"{"lake": {"HU": [-82.4, 44.8], "ER": [-81.2, 42.2]}, "mu": {"MH-1": [-87.0, 45.5]}}"#,
        )
        .unwrap();
        assert_eq!(centroids.get(SpatialUnit::Lake, "HU"), Some((-82.4, 44.8)));
        assert_eq!(centroids.get(SpatialUnit::ManagementUnit, "MH-1"), Some((-87.0, 45.5)));
        assert_eq!(centroids.get(SpatialUnit::Lake, "SU"), None);
        assert_eq!(centroids.get(SpatialUnit::Grid10, "1234"), None);
        assert_eq!(centroids.len(SpatialUnit::Lake), 2);
    }

    #[test]
    fn test_insert() {
        let mut centroids = Centroids::default();
        centroids.insert(SpatialUnit::Jurisdiction, "er_oh", -82.0, 41.7);
        assert_eq!(centroids.get(SpatialUnit::Jurisdiction, "er_oh"), Some((-82.0, 41.7)));
    }
}
