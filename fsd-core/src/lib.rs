//! Core types for the Great Lakes fish stocking dashboard.
//!
//! - `event`: the raw and normalized stocking event records and the
//!   attribute enumeration the aggregation engine indexes on
//! - `spatial`: the spatial units markers can be aggregated at
//! - `loader`: JSON / CSV dataset parsing (and HTTP fetch behind `api`)
//! - `centroids`: marker positions for polygon-based spatial units

pub mod centroids;
pub mod error;
pub mod event;
pub mod loader;
pub mod spatial;

pub use event::{Attribute, RawEvent, StockingEvent};
pub use spatial::SpatialUnit;
