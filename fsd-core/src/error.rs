//! Error types shared by the FSD crates.

/// A key name that does not name anything the dashboard knows about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("unknown attribute: {0:?}")]
    UnknownAttribute(String),

    #[error("unknown spatial unit: {0:?}")]
    UnknownSpatialUnit(String),
}

/// Failures while reading a dataset.
///
/// Only structural problems end up here; a bad value inside an otherwise
/// readable row is coerced by the normalizer instead.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("all {attempts} attempts to fetch {url} failed")]
    Fetch { url: String, attempts: u32 },
}
