//! Property-based tests for the aggregation engine using proptest.

use proptest::prelude::*;

use fsd_core::{Attribute, RawEvent, StockingEvent};
use fsd_xf::dimension::{Dimension, Filter};
use fsd_xf::reducer::{BreakdownReducer, Reducer, SumReducer};
use fsd_xf::{Coordinator, DashboardConfig, Measure};

const LAKES: [&str; 4] = ["ER", "HU", "MI", "SU"];
const SPECIES: [&str; 3] = ["Lake Trout", "Walleye", "Coho Salmon"];

fn event(lake: usize, species: usize, events: i64, yreq: i64) -> StockingEvent {
    let mut event = StockingEvent::normalize(&RawEvent::default());
    event.lake = LAKES[lake].to_string();
    event.species = SPECIES[species].to_string();
    event.events = events;
    event.yreq = yreq;
    event.total_stocked = yreq * 10;
    event
}

fn arb_event() -> impl Strategy<Value = StockingEvent> {
    (0..LAKES.len(), 0..SPECIES.len(), 1i64..10, 0i64..5000)
        .prop_map(|(lake, species, events, yreq)| event(lake, species, events, yreq))
}

// --- Reducer symmetry ---

proptest! {
    #[test]
    fn breakdown_add_then_remove_restores(
        base in prop::collection::vec(arb_event(), 0..20),
        extra in arb_event(),
    ) {
        let reducer = BreakdownReducer;
        let mut acc = reducer.initial();
        for e in &base {
            reducer.add(&mut acc, e);
        }
        let before = acc.clone();
        reducer.add(&mut acc, &extra);
        reducer.remove(&mut acc, &extra);
        prop_assert_eq!(acc, before);
    }

    #[test]
    fn sum_remove_then_add_restores(
        base in prop::collection::vec(arb_event(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let reducer = SumReducer { measure: Measure::Yreq };
        let mut acc = reducer.initial();
        for e in &base {
            reducer.add(&mut acc, e);
        }
        let before = acc;
        let member = &base[pick.index(base.len())];
        reducer.remove(&mut acc, member);
        reducer.add(&mut acc, member);
        prop_assert_eq!(acc, before);
    }
}

// --- Filter idempotence ---

proptest! {
    #[test]
    fn set_filter_twice_changes_nothing(
        values in prop::collection::vec(0..LAKES.len(), 0..30),
        keep in prop::collection::btree_set(0..LAKES.len(), 0..=LAKES.len()),
    ) {
        let mut dim = Dimension::new(Attribute::Lake);
        for (record, &v) in values.iter().enumerate() {
            dim.insert(record, LAKES[v]);
        }
        let filter: Filter = keep.iter().map(|&i| LAKES[i]).collect();
        dim.set_filter(filter.clone());
        let once: Vec<bool> = (0..values.len()).map(|r| dim.accepts(r)).collect();
        prop_assert!(dim.set_filter(filter).is_empty());
        let twice: Vec<bool> = (0..values.len()).map(|r| dim.accepts(r)).collect();
        prop_assert_eq!(once, twice);
    }
}

// --- Coordinator consistency ---

#[derive(Debug, Clone)]
enum Toggle {
    Check(Attribute, String),
    Uncheck(Attribute, String),
    Clear(Attribute),
}

fn arb_toggle() -> impl Strategy<Value = Toggle> {
    let lake = (0..LAKES.len()).prop_map(|i| LAKES[i].to_string());
    let species = (0..SPECIES.len()).prop_map(|i| SPECIES[i].to_string());
    prop_oneof![
        lake.clone().prop_map(|v| Toggle::Check(Attribute::Lake, v)),
        lake.prop_map(|v| Toggle::Uncheck(Attribute::Lake, v)),
        species.clone().prop_map(|v| Toggle::Check(Attribute::Species, v)),
        species.prop_map(|v| Toggle::Uncheck(Attribute::Species, v)),
        Just(Toggle::Clear(Attribute::Species)),
    ]
}

fn passes(xf: &Coordinator, e: &StockingEvent, skip: Option<Attribute>) -> bool {
    [Attribute::Lake, Attribute::Species]
        .into_iter()
        .filter(|&a| Some(a) != skip)
        .all(|a| xf.registry().is_checked(a, e.attribute(a)).unwrap_or(true))
}

proptest! {
    #[test]
    fn groups_match_a_full_recount(
        events in prop::collection::vec(arb_event(), 1..25),
        toggles in prop::collection::vec(arb_toggle(), 0..12),
    ) {
        let mut xf = Coordinator::new(events.clone(), DashboardConfig::default());
        let initial = xf.stats();
        for toggle in &toggles {
            match toggle {
                Toggle::Check(key, value) => xf.check(*key, value).unwrap(),
                Toggle::Uncheck(key, value) => xf.uncheck(*key, value).unwrap(),
                Toggle::Clear(key) => xf.clear_filter(*key).unwrap(),
            }
        }

        let visible: i64 = events.iter().filter(|e| passes(&xf, e, None)).map(|e| e.events).sum();
        prop_assert_eq!(xf.grand_total().total(Measure::Events), visible);
        prop_assert_eq!(xf.stats().event_count, visible);

        // The lake panel ignores the lake filter but honours the species one.
        for entry in xf.group_snapshot(Attribute::Lake) {
            let expected: i64 = events
                .iter()
                .filter(|e| e.lake == entry.key && passes(&xf, e, Some(Attribute::Lake)))
                .map(|e| e.events)
                .sum();
            prop_assert_eq!(entry.value, expected);
        }

        xf.change_filter(Attribute::Lake, LAKES).unwrap();
        xf.change_filter(Attribute::Species, SPECIES).unwrap();
        prop_assert_eq!(xf.stats(), initial);
    }
}
