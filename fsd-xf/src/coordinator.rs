//! The cross-dimensional coordinator.
//!
//! Owns the events, one [`Dimension`] per attribute, a sum group per
//! dimension, a breakdown group per configured spatial unit and the grand
//! total. Each event carries a bitmask of the dimensions currently rejecting
//! it. A group on dimension `d` sees an event when no dimension other than
//! `d` rejects it; the grand total sees it when nothing does. A filter change
//! on `d` therefore only touches the events whose value flipped on `d`, and
//! never the groups on `d` itself.

use fsd_core::centroids::Centroids;
use fsd_core::{Attribute, SpatialUnit, StockingEvent};
use fsd_utils::coords::parse_point;
use fsd_utils::months::month_label;
use log::{debug, info, warn};
use std::collections::BTreeMap;

use crate::config::DashboardConfig;
use crate::dimension::{Dimension, Filter, RecordId};
use crate::error::{Result, XfError};
use crate::group::{compare_keys, Group, GroupAll};
use crate::models::{
    CheckboxEntry, CheckboxPanel, GroupEntry, Slice, SpatialPoint, SpeciesRow, StatsPanel,
};
use crate::reducer::{Breakdown, BreakdownReducer, Measure, SumReducer};
use crate::registry::FilterRegistry;

const DIMENSIONS: usize = Attribute::ALL.len();

fn bit(attribute: Attribute) -> u32 {
    1 << attribute.index()
}

/// What changed, passed to every subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A dimension's filter was replaced; `moved` events crossed a filter boundary.
    Filtered { attribute: Attribute, moved: usize },
    SpatialUnit(SpatialUnit),
    Added(usize),
    Removed(usize),
}

type Listener = Box<dyn FnMut(&Coordinator, &ChangeEvent)>;

/// Every group the coordinator maintains.
struct Groups {
    sums: Vec<Group<SumReducer>>,
    breakdowns: BTreeMap<SpatialUnit, Group<BreakdownReducer>>,
    all: GroupAll<BreakdownReducer>,
}

impl Groups {
    /// Move one event between visible and hidden in every group whose view
    /// of it differs between the two masks.
    fn shift(
        &mut self,
        dims: &[Dimension],
        record: RecordId,
        event: &StockingEvent,
        old_mask: u32,
        new_mask: u32,
    ) {
        for attribute in Attribute::ALL {
            let others = !bit(attribute);
            let was = old_mask & others == 0;
            let is = new_mask & others == 0;
            if was == is {
                continue;
            }
            let dim = &dims[attribute.index()];
            let id = dim.value_of(record);
            let breakdown = SpatialUnit::for_attribute(attribute)
                .and_then(|unit| self.breakdowns.get_mut(&unit));
            let sum = &mut self.sums[attribute.index()];
            if is {
                sum.add(id, event);
                if let Some(group) = breakdown {
                    group.add(id, event);
                }
            } else {
                sum.remove(id, event);
                if let Some(group) = breakdown {
                    group.remove(id, event);
                }
            }
        }
        match (old_mask == 0, new_mask == 0) {
            (false, true) => self.all.add(event),
            (true, false) => self.all.remove(event),
            _ => {}
        }
    }
}

pub struct Coordinator {
    config: DashboardConfig,
    events: Vec<StockingEvent>,
    live: Vec<bool>,
    masks: Vec<u32>,
    dims: Vec<Dimension>,
    groups: Groups,
    registry: FilterRegistry,
    centroids: Centroids,
    unit: SpatialUnit,
    listeners: Vec<Listener>,
}

impl Coordinator {
    /// Index `events` with every filter open and every checkbox checked.
    pub fn new(events: Vec<StockingEvent>, config: DashboardConfig) -> Self {
        let dims = Attribute::ALL.into_iter().map(Dimension::new).collect();
        let sums = (0..DIMENSIONS)
            .map(|_| {
                Group::new(SumReducer {
                    measure: config.checkbox_measure,
                })
            })
            .collect();
        let breakdowns = config
            .strata
            .iter()
            .map(|stratum| (stratum.unit, Group::new(BreakdownReducer)))
            .collect();
        let mut registry = FilterRegistry::new();
        for &key in &config.filter_keys {
            registry.initialize(key, Vec::<String>::new());
        }
        let unit = config.initial_unit;

        let mut coordinator = Coordinator {
            config,
            events: Vec::new(),
            live: Vec::new(),
            masks: Vec::new(),
            dims,
            groups: Groups {
                sums,
                breakdowns,
                all: GroupAll::new(BreakdownReducer),
            },
            registry,
            centroids: Centroids::default(),
            unit,
            listeners: Vec::new(),
        };
        coordinator.insert(events);
        info!(
            "coordinator: Indexed {} events across {} dimensions ({} spatial groups, {} filter keys)",
            coordinator.events.len(),
            DIMENSIONS,
            coordinator.groups.breakdowns.len(),
            coordinator.config.filter_keys.len()
        );
        coordinator
    }

    pub fn with_centroids(mut self, centroids: Centroids) -> Self {
        self.centroids = centroids;
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn dimension(&self, attribute: Attribute) -> &Dimension {
        &self.dims[attribute.index()]
    }

    /// Number of live events, filtered or not.
    pub fn len(&self) -> usize {
        self.live.iter().filter(|&&live| live).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to change notifications.
    ///
    /// Listeners get a shared reference, so they can read snapshots but
    /// cannot trigger further changes from inside a notification.
    pub fn on_change(&mut self, listener: impl FnMut(&Coordinator, &ChangeEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, event: ChangeEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener(self, &event);
        }
        self.listeners = listeners;
    }

    fn insert(&mut self, events: Vec<StockingEvent>) {
        for event in events {
            let record = self.events.len();
            let mut mask = 0;
            for attribute in Attribute::ALL {
                let dim = &mut self.dims[attribute.index()];
                let value = event.attribute(attribute);
                let (id, accepted) = dim.insert(record, value);
                // A panel's checked set mirrors what its filter accepts.
                if !accepted {
                    mask |= bit(attribute);
                } else if let Some(checked) = self.registry.checked_mut(attribute) {
                    checked.insert(value.to_string());
                }
                self.groups.sums[attribute.index()].touch(id);
                if let Some(group) = SpatialUnit::for_attribute(attribute)
                    .and_then(|unit| self.groups.breakdowns.get_mut(&unit))
                {
                    group.touch(id);
                }
            }
            // Start from "hidden everywhere" so shift adds it where visible.
            self.groups
                .shift(&self.dims, record, &event, u32::MAX, mask);
            self.events.push(event);
            self.live.push(true);
            self.masks.push(mask);
        }
    }

    /// Add events to an existing dataset.
    pub fn add(&mut self, events: Vec<StockingEvent>) {
        let count = events.len();
        self.insert(events);
        info!("coordinator: Added {} events", count);
        self.notify(ChangeEvent::Added(count));
    }

    /// Remove every event that currently passes all filters.
    pub fn remove(&mut self) -> usize {
        let removed: Vec<RecordId> = (0..self.events.len())
            .filter(|&record| self.visible(record))
            .collect();
        for &record in &removed {
            self.groups
                .shift(&self.dims, record, &self.events[record], 0, u32::MAX);
            self.live[record] = false;
        }
        for dim in self.dims.iter_mut() {
            dim.remove(&removed);
        }
        info!("coordinator: Removed {} events", removed.len());
        self.notify(ChangeEvent::Removed(removed.len()));
        removed.len()
    }

    /// Replace the filter on one dimension and move the affected events.
    fn apply(&mut self, attribute: Attribute, filter: Filter) -> usize {
        let idx = attribute.index();
        let flipped = self.dims[idx].set_filter(filter);
        let mut moved = 0;
        for (id, accepted) in flipped {
            for &record in self.dims[idx].members(id) {
                let old_mask = self.masks[record];
                let new_mask = if accepted {
                    old_mask & !bit(attribute)
                } else {
                    old_mask | bit(attribute)
                };
                self.masks[record] = new_mask;
                self.groups
                    .shift(&self.dims, record, &self.events[record], old_mask, new_mask);
                moved += 1;
            }
        }
        debug!(
            "coordinator: Filter on {} now {:?}; {} events moved",
            attribute,
            self.dims[idx].filter(),
            moved
        );
        moved
    }

    fn apply_registry(&mut self, key: Attribute) -> Result<()> {
        let checked = self.registry.get(key)?.clone();
        let moved = self.apply(key, Filter::In(checked));
        self.notify(ChangeEvent::Filtered {
            attribute: key,
            moved,
        });
        Ok(())
    }

    /// Check exactly `values` for `key`.
    pub fn change_filter<I, S>(&mut self, key: Attribute, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.set(key, values)?;
        self.apply_registry(key)
    }

    pub fn check(&mut self, key: Attribute, value: &str) -> Result<()> {
        self.registry.check(key, value)?;
        self.apply_registry(key)
    }

    pub fn uncheck(&mut self, key: Attribute, value: &str) -> Result<()> {
        self.registry.uncheck(key, value)?;
        self.apply_registry(key)
    }

    /// Uncheck everything: the dimension rejects every event.
    ///
    /// Groups ignore their own dimension's filter, so `group_snapshot(key)`
    /// and the key's checkbox panel still list every option (unchecked) and
    /// the boxes can be re-checked. Every other group, the grand total and
    /// `spatial_snapshot` for a unit on `key` come back empty.
    pub fn clear_filter(&mut self, key: Attribute) -> Result<()> {
        self.registry.clear(key)?;
        self.apply_registry(key)
    }

    /// Check every value currently offered in the panel for `key`.
    pub fn select_all_filter(&mut self, key: Attribute) -> Result<()> {
        self.registry.get(key)?;
        let offered: Vec<String> = self
            .group_snapshot(key)
            .into_iter()
            .map(|entry| entry.key)
            .collect();
        self.registry.set(key, offered)?;
        self.apply_registry(key)
    }

    /// Apply an arbitrary predicate to any dimension.
    ///
    /// If `attribute` has a checkbox panel, its checked set follows the
    /// values the predicate accepts.
    pub fn filter(&mut self, attribute: Attribute, filter: Filter) {
        let dim = &self.dims[attribute.index()];
        if let Some(checked) = self.registry.checked_mut(attribute) {
            *checked = dim
                .sorted()
                .map(|(value, _)| value)
                .filter(|value| filter.accepts(value))
                .map(str::to_string)
                .collect();
        }
        let moved = self.apply(attribute, filter);
        self.notify(ChangeEvent::Filtered { attribute, moved });
    }

    /// Remove any restriction on `attribute`.
    pub fn filter_all(&mut self, attribute: Attribute) {
        self.filter(attribute, Filter::All);
    }

    /// Select which breakdown group the map reads from. Filters are untouched.
    pub fn set_spatial_unit(&mut self, unit: SpatialUnit) -> Result<()> {
        if !self.config.has_unit(unit) {
            return Err(XfError::UnknownSpatialUnit(unit));
        }
        self.unit = unit;
        self.notify(ChangeEvent::SpatialUnit(unit));
        Ok(())
    }

    pub fn spatial_unit(&self) -> SpatialUnit {
        self.unit
    }

    fn visible(&self, record: RecordId) -> bool {
        self.live[record] && self.masks[record] == 0
    }

    /// Events passing every filter.
    pub fn visible_records(&self) -> Vec<&StockingEvent> {
        (0..self.events.len())
            .filter(|&r| self.visible(r))
            .map(|r| &self.events[r])
            .collect()
    }

    /// Up to `n` visible events, by descending `attribute` value.
    pub fn top(&self, attribute: Attribute, n: usize) -> Vec<&StockingEvent> {
        self.dimension(attribute)
            .top(n, |r| self.visible(r))
            .into_iter()
            .map(|r| &self.events[r])
            .collect()
    }

    /// Per-value sums for one attribute, ignoring that attribute's own filter.
    ///
    /// Only positive values are returned, in key order.
    pub fn group_snapshot(&self, attribute: Attribute) -> Vec<GroupEntry> {
        let dim = self.dimension(attribute);
        let mut entries: Vec<GroupEntry> = self.groups.sums[attribute.index()]
            .all(dim)
            .into_iter()
            .filter(|&(_, &value)| value > 0)
            .map(|(key, &value)| GroupEntry {
                key: key.to_string(),
                value,
            })
            .collect();
        entries.sort_by(|a, b| compare_keys(&a.key, &b.key));
        entries
    }

    /// The checkbox panel for a registered key.
    pub fn checkbox_panel(&self, key: Attribute) -> Result<CheckboxPanel> {
        let checked = self.registry.get(key)?;
        let entries = self
            .group_snapshot(key)
            .into_iter()
            .map(|entry| CheckboxEntry {
                label: match key {
                    Attribute::StockingMonth => month_label(&entry.key),
                    _ => entry.key.clone(),
                },
                checked: checked.contains(&entry.key),
                key: entry.key,
                value: entry.value,
            })
            .collect();
        Ok(CheckboxPanel {
            key,
            label: key.label().to_string(),
            entries,
        })
    }

    /// The breakdown for one location, as maintained (zeroed species included).
    pub fn breakdown(&self, unit: SpatialUnit, key: &str) -> Result<Option<&Breakdown>> {
        let group = self
            .groups
            .breakdowns
            .get(&unit)
            .ok_or(XfError::UnknownSpatialUnit(unit))?;
        let dim = self.dimension(unit.attribute());
        Ok(dim.id_of(key).and_then(|id| group.get(id)))
    }

    /// Map markers for `unit`, largest total first.
    ///
    /// Locations the unit's own dimension currently rejects are left out, as
    /// are locations whose total is not positive.
    pub fn spatial_snapshot(&self, unit: SpatialUnit) -> Result<Vec<SpatialPoint>> {
        let group = self
            .groups
            .breakdowns
            .get(&unit)
            .ok_or(XfError::UnknownSpatialUnit(unit))?;
        let dim = self.dimension(unit.attribute());
        let measure = self.config.response_var;
        let mut missing = 0;
        let mut points: Vec<SpatialPoint> = dim
            .sorted()
            .filter(|&(_, id)| dim.accepts_value(id))
            .filter_map(|(key, id)| group.get(id).map(|breakdown| (key, breakdown)))
            .filter_map(|(key, breakdown)| {
                let total = breakdown.total(measure);
                if total <= 0 {
                    return None;
                }
                let values = breakdown
                    .iter()
                    .map(|(species, counts)| Slice {
                        slice: species.to_string(),
                        value: counts.get(measure),
                    })
                    .filter(|slice| slice.value > 0)
                    .collect();
                let coordinates = match unit {
                    SpatialUnit::Geometry => parse_point(key).ok(),
                    _ => self.centroids.get(unit, key),
                };
                if coordinates.is_none() {
                    missing += 1;
                }
                Some(SpatialPoint {
                    key: key.to_string(),
                    coordinates,
                    values,
                    total,
                })
            })
            .collect();
        if missing > 0 {
            warn!(
                "coordinator: {} of {} {} markers have no coordinates",
                missing,
                points.len(),
                unit
            );
        }
        points.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
        Ok(points)
    }

    /// Look a unit up by its selector name.
    pub fn spatial_snapshot_named(&self, unit: &str) -> Result<Vec<SpatialPoint>> {
        self.spatial_snapshot(unit.parse()?)
    }

    /// Map markers for the currently selected unit.
    pub fn current_spatial_snapshot(&self) -> Result<Vec<SpatialPoint>> {
        self.spatial_snapshot(self.unit)
    }

    /// Per-species totals over every visible event.
    pub fn grand_total(&self) -> &Breakdown {
        self.groups.all.value()
    }

    pub fn stats(&self) -> StatsPanel {
        let current = self.grand_total();
        let mut rows: Vec<SpeciesRow> = current
            .iter()
            .filter(|(_, counts)| counts.events > 0)
            .map(|(species, counts)| SpeciesRow {
                species: species.to_string(),
                events: counts.events,
                yreq: counts.yreq,
                total: counts.total,
            })
            .collect();
        rows.sort_by(|a, b| b.yreq.cmp(&a.yreq).then_with(|| a.species.cmp(&b.species)));
        StatsPanel {
            species_count: current.species_count(),
            event_count: current.total(Measure::Events),
            total_stocked: current.total(Measure::Total),
            yreq_stocked: current.total(Measure::Yreq),
            rows,
        }
    }
}
