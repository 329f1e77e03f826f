//! Incremental multi-dimensional aggregation over stocking events.
//!
//! Checkbox filters on many attributes at once, with per-value totals and
//! per-location species breakdowns kept current as filters change.
//!
//! # Architecture
//!
//! - [`dimension::Dimension`]: sorted value index and filter for one attribute
//! - [`reducer`]: add/remove/initial triples (`SumReducer`, `BreakdownReducer`)
//! - [`group`]: aggregates keyed by a dimension's values, plus the grand total
//! - [`registry::FilterRegistry`]: checked values per checkbox panel
//! - [`Coordinator`]: owns all of the above for one dataset and routes
//!   filter changes, then notifies subscribers once per change
//!
//! # Usage
//!
//! ```rust
//! use fsd_core::loader::load_events_json;
//! use fsd_core::{Attribute, SpatialUnit};
//! use fsd_xf::{Coordinator, DashboardConfig};
//!
//! let events = load_events_json(
//!     r#"[{"lake":"ER","species_name":"Walleye","events":2,"yreq":1000,"total_stocked":50000},
//!         {"lake":"HU","species_name":"Walleye","events":3,"yreq":1500,"total_stocked":75000}]"#,
//! )
//! .unwrap();
//! let mut xf = Coordinator::new(events, DashboardConfig::default());
//! xf.uncheck(Attribute::Lake, "HU").unwrap();
//!
//! assert_eq!(xf.stats().event_count, 2);
//! let markers = xf.spatial_snapshot(SpatialUnit::Lake).unwrap();
//! assert_eq!(markers.len(), 1);
//! assert_eq!(markers[0].key, "ER");
//! ```

pub mod config;
pub mod coordinator;
pub mod dimension;
pub mod error;
pub mod group;
pub mod models;
pub mod reducer;
pub mod registry;

pub use config::{DashboardConfig, SpatialStratum};
pub use coordinator::{ChangeEvent, Coordinator};
pub use dimension::Filter;
pub use error::XfError;
pub use reducer::{Breakdown, Counts, Measure};
