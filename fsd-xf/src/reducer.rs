//! Reducers maintain a group's aggregate as events enter and leave its
//! visible set. Every reducer is a symmetric add/remove pair plus an
//! initializer.

use fsd_core::StockingEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A numeric measure carried by each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    #[default]
    Events,
    Yreq,
    #[serde(alias = "total_stocked")]
    Total,
}

impl Measure {
    pub fn of(self, event: &StockingEvent) -> i64 {
        match self {
            Measure::Events => event.events,
            Measure::Yreq => event.yreq,
            Measure::Total => event.total_stocked,
        }
    }
}

pub trait Reducer {
    type Value: Clone + fmt::Debug;

    fn initial(&self) -> Self::Value;
    fn add(&self, acc: &mut Self::Value, event: &StockingEvent);
    fn remove(&self, acc: &mut Self::Value, event: &StockingEvent);
}

/// Sums one measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumReducer {
    pub measure: Measure,
}

impl Reducer for SumReducer {
    type Value = i64;

    fn initial(&self) -> i64 {
        0
    }

    fn add(&self, acc: &mut i64, event: &StockingEvent) {
        *acc += self.measure.of(event);
    }

    fn remove(&self, acc: &mut i64, event: &StockingEvent) {
        *acc -= self.measure.of(event);
    }
}

/// Per-species totals inside a [`Breakdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub yreq: i64,
    pub total: i64,
    pub events: i64,
}

impl Counts {
    pub fn get(&self, measure: Measure) -> i64 {
        match measure {
            Measure::Events => self.events,
            Measure::Yreq => self.yreq,
            Measure::Total => self.total,
        }
    }
}

/// Species name -> accumulated counts.
///
/// Entries are never deleted, so a species whose events have all been
/// filtered away stays behind with zero counts. Readers must skip those.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown(BTreeMap<String, Counts>);

impl Breakdown {
    pub fn get(&self, species: &str) -> Option<&Counts> {
        self.0.get(species)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Counts)> {
        self.0.iter().map(|(species, counts)| (species.as_str(), counts))
    }

    /// Sum of `measure` across all species.
    pub fn total(&self, measure: Measure) -> i64 {
        self.0.values().map(|counts| counts.get(measure)).sum()
    }

    /// Number of species with at least one event.
    pub fn species_count(&self) -> usize {
        self.0.values().filter(|counts| counts.events > 0).count()
    }

    /// Number of species keys held, including zeroed ones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, Counts); N]> for Breakdown {
    fn from(entries: [(&str, Counts); N]) -> Self {
        Breakdown(
            entries
                .into_iter()
                .map(|(species, counts)| (species.to_string(), counts))
                .collect(),
        )
    }
}

/// Accumulates yearling equivalents, fish stocked and event counts by species.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakdownReducer;

impl Reducer for BreakdownReducer {
    type Value = Breakdown;

    fn initial(&self) -> Breakdown {
        Breakdown::default()
    }

    fn add(&self, acc: &mut Breakdown, event: &StockingEvent) {
        let counts = acc.0.entry(event.species.clone()).or_default();
        counts.yreq += event.yreq;
        counts.total += event.total_stocked;
        counts.events += event.events;
    }

    // TODO: drop species entries once all three counts return to zero; long
    // filtering sessions currently keep every species ever seen per key.
    fn remove(&self, acc: &mut Breakdown, event: &StockingEvent) {
        let counts = acc.0.entry(event.species.clone()).or_default();
        counts.yreq -= event.yreq;
        counts.total -= event.total_stocked;
        counts.events -= event.events;
    }
}
