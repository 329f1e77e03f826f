//! One index per categorical attribute.
//!
//! A [`Dimension`] interns the attribute's distinct values, keeps them in
//! sorted order with the ids of the events that carry each one, and holds the
//! active [`Filter`]. It knows nothing about groups; when its filter changes
//! it reports which values flipped so the coordinator can move exactly the
//! affected events in and out of every group.

use fsd_core::Attribute;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

pub type RecordId = usize;
pub type ValueId = usize;

/// The inclusion predicate attached to a dimension.
#[derive(Clone, Default)]
pub enum Filter {
    /// No restriction.
    #[default]
    All,
    Exact(String),
    /// Values in `lo..hi`, in the index's sort order.
    Range { lo: String, hi: String },
    /// Membership in a set. The empty set rejects every event.
    In(BTreeSet<String>),
    Function(Rc<dyn Fn(&str) -> bool>),
}

impl Filter {
    /// A filter that rejects everything.
    pub fn none() -> Filter {
        Filter::In(BTreeSet::new())
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Exact(v) => v == value,
            Filter::Range { lo, hi } => lo.as_str() <= value && value < hi.as_str(),
            Filter::In(set) => set.contains(value),
            Filter::Function(f) => f(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("All"),
            Filter::Exact(v) => f.debug_tuple("Exact").field(v).finish(),
            Filter::Range { lo, hi } => f
                .debug_struct("Range")
                .field("lo", lo)
                .field("hi", hi)
                .finish(),
            Filter::In(set) => f.debug_tuple("In").field(set).finish(),
            Filter::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Filter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Filter::In(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug)]
pub struct Dimension {
    attribute: Attribute,
    values: Vec<String>,
    lookup: HashMap<String, ValueId>,
    order: BTreeMap<String, ValueId>,
    members: Vec<Vec<RecordId>>,
    record_values: Vec<ValueId>,
    accepted: Vec<bool>,
    filter: Filter,
}

impl Dimension {
    pub fn new(attribute: Attribute) -> Self {
        Self {
            attribute,
            values: Vec::new(),
            lookup: HashMap::new(),
            order: BTreeMap::new(),
            members: Vec::new(),
            record_values: Vec::new(),
            accepted: Vec::new(),
            filter: Filter::All,
        }
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Index the next event. Record ids must be assigned densely from 0.
    ///
    /// Returns the value id and whether the current filter accepts it.
    pub fn insert(&mut self, record: RecordId, value: &str) -> (ValueId, bool) {
        debug_assert_eq!(record, self.record_values.len());
        let id = match self.lookup.get(value) {
            Some(&id) => id,
            None => {
                let id = self.values.len();
                self.values.push(value.to_string());
                self.lookup.insert(value.to_string(), id);
                self.order.insert(value.to_string(), id);
                self.members.push(Vec::new());
                self.accepted.push(self.filter.accepts(value));
                id
            }
        };
        self.members[id].push(record);
        self.record_values.push(id);
        (id, self.accepted[id])
    }

    /// Drop events from the value index. Their ids stay reserved.
    pub fn remove(&mut self, records: &[RecordId]) {
        let gone: HashSet<RecordId> = records.iter().copied().collect();
        let touched: BTreeSet<ValueId> = records.iter().map(|&r| self.record_values[r]).collect();
        for id in touched {
            self.members[id].retain(|r| !gone.contains(r));
        }
    }

    /// Replace the filter. Returns every value whose acceptance changed,
    /// paired with its new acceptance.
    pub fn set_filter(&mut self, filter: Filter) -> Vec<(ValueId, bool)> {
        let mut flipped = Vec::new();
        for (id, value) in self.values.iter().enumerate() {
            let now = filter.accepts(value);
            if now != self.accepted[id] {
                self.accepted[id] = now;
                flipped.push((id, now));
            }
        }
        self.filter = filter;
        flipped
    }

    pub fn value_of(&self, record: RecordId) -> ValueId {
        self.record_values[record]
    }

    pub fn value(&self, id: ValueId) -> &str {
        &self.values[id]
    }

    pub fn id_of(&self, value: &str) -> Option<ValueId> {
        self.lookup.get(value).copied()
    }

    pub fn accepts_value(&self, id: ValueId) -> bool {
        self.accepted[id]
    }

    pub fn accepts(&self, record: RecordId) -> bool {
        self.accepted[self.record_values[record]]
    }

    pub fn members(&self, id: ValueId) -> &[RecordId] {
        &self.members[id]
    }

    /// Distinct values ever indexed.
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }

    /// Values in ascending order with their ids.
    pub fn sorted(&self) -> impl DoubleEndedIterator<Item = (&str, ValueId)> {
        self.order.iter().map(|(value, &id)| (value.as_str(), id))
    }

    /// Up to `n` records passing `visible`, by descending value.
    pub fn top(&self, n: usize, visible: impl Fn(RecordId) -> bool) -> Vec<RecordId> {
        self.sorted()
            .rev()
            .flat_map(|(_, id)| self.members[id].iter().copied())
            .filter(|&r| visible(r))
            .take(n)
            .collect()
    }

    /// Up to `n` records passing `visible`, by ascending value.
    pub fn bottom(&self, n: usize, visible: impl Fn(RecordId) -> bool) -> Vec<RecordId> {
        self.sorted()
            .flat_map(|(_, id)| self.members[id].iter().copied())
            .filter(|&r| visible(r))
            .take(n)
            .collect()
    }
}
