//! Incrementally maintained aggregates over a dimension's values.

use fsd_core::StockingEvent;
use std::cmp::Ordering;

use crate::dimension::{Dimension, ValueId};
use crate::reducer::Reducer;

/// Value id -> aggregate, for one dimension.
///
/// The group does not own its keys; reads go through the [`Dimension`] it
/// was built for.
#[derive(Debug, Clone)]
pub struct Group<R: Reducer> {
    reducer: R,
    acc: Vec<R::Value>,
}

impl<R: Reducer> Group<R> {
    pub fn new(reducer: R) -> Self {
        Self {
            reducer,
            acc: Vec::new(),
        }
    }

    fn grow(&mut self, id: ValueId) {
        while self.acc.len() <= id {
            self.acc.push(self.reducer.initial());
        }
    }

    /// Make sure `id` has an accumulator even if nothing is visible under it.
    pub fn touch(&mut self, id: ValueId) {
        self.grow(id);
    }

    pub fn add(&mut self, id: ValueId, event: &StockingEvent) {
        self.grow(id);
        self.reducer.add(&mut self.acc[id], event);
    }

    pub fn remove(&mut self, id: ValueId, event: &StockingEvent) {
        self.grow(id);
        self.reducer.remove(&mut self.acc[id], event);
    }

    pub fn get(&self, id: ValueId) -> Option<&R::Value> {
        self.acc.get(id)
    }

    /// Every key with its aggregate, in ascending key order.
    pub fn all<'a>(&'a self, dimension: &'a Dimension) -> Vec<(&'a str, &'a R::Value)> {
        dimension
            .sorted()
            .filter_map(|(key, id)| self.acc.get(id).map(|value| (key, value)))
            .collect()
    }
}

impl<R> Group<R>
where
    R: Reducer,
    R::Value: Ord,
{
    /// Up to `n` keys by descending aggregate; ties keep key order.
    pub fn top<'a>(&'a self, dimension: &'a Dimension, n: usize) -> Vec<(&'a str, &'a R::Value)> {
        let mut entries = self.all(dimension);
        entries.sort_by(|a, b| b.1.cmp(a.1));
        entries.truncate(n);
        entries
    }
}

/// A single aggregate over every visible event.
#[derive(Debug, Clone)]
pub struct GroupAll<R: Reducer> {
    reducer: R,
    value: R::Value,
}

impl<R: Reducer> GroupAll<R> {
    pub fn new(reducer: R) -> Self {
        let value = reducer.initial();
        Self { reducer, value }
    }

    pub fn add(&mut self, event: &StockingEvent) {
        self.reducer.add(&mut self.value, event);
    }

    pub fn remove(&mut self, event: &StockingEvent) {
        self.reducer.remove(&mut self.value, event);
    }

    pub fn value(&self) -> &R::Value {
        &self.value
    }
}

/// Key ordering for panels: numeric keys compare as numbers, the rest as
/// strings, numbers first.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
