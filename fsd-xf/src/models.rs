//! Snapshot structs handed to the view layer.
//!
//! All structs derive `Serialize` so a renderer can take them as JSON.

use fsd_core::Attribute;
use serde::Serialize;

/// One checkbox option with its count.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupEntry {
    pub key: String,
    pub value: i64,
}

/// One pie slice of a map marker.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Slice {
    pub slice: String,
    pub value: i64,
}

/// A map marker at the current spatial unit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpatialPoint {
    pub key: String,
    /// (lon, lat), when known.
    pub coordinates: Option<(f64, f64)>,
    /// Positive slices by species name.
    pub values: Vec<Slice>,
    pub total: i64,
}

impl SpatialPoint {
    /// Slices largest first, for the point info table.
    pub fn ranked_slices(&self) -> Vec<&Slice> {
        let mut slices: Vec<&Slice> = self.values.iter().collect();
        slices.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.slice.cmp(&b.slice)));
        slices
    }
}

/// A row of the stats panel summary table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpeciesRow {
    pub species: String,
    pub events: i64,
    pub yreq: i64,
    pub total: i64,
}

/// Totals over every visible event.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsPanel {
    /// Species with at least one event.
    pub species_count: usize,
    pub event_count: i64,
    pub total_stocked: i64,
    pub yreq_stocked: i64,
    /// By yearling equivalents, largest first.
    pub rows: Vec<SpeciesRow>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckboxEntry {
    pub key: String,
    pub label: String,
    pub value: i64,
    pub checked: bool,
}

/// Everything needed to draw one checkbox panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckboxPanel {
    pub key: Attribute,
    pub label: String,
    pub entries: Vec<CheckboxEntry>,
}
