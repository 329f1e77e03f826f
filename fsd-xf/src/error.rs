use fsd_core::error::KeyError;
use fsd_core::{Attribute, SpatialUnit};

/// Usage and configuration errors raised by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XfError {
    #[error("filter key {0} was not initialized when the dataset was loaded")]
    UnknownFilterKey(Attribute),

    #[error("spatial unit {0} is not configured")]
    UnknownSpatialUnit(SpatialUnit),

    #[error(transparent)]
    Key(#[from] KeyError),
}

pub type Result<T> = std::result::Result<T, XfError>;
