use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{error::KeyError, event::Attribute};

/// The spatial granularity map markers are aggregated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpatialUnit {
    Lake,
    StateProvince,
    Jurisdiction,
    ManagementUnit,
    Grid10,
    Geometry,
}

impl SpatialUnit {
    pub const ALL: [SpatialUnit; 6] = [
        SpatialUnit::Lake,
        SpatialUnit::StateProvince,
        SpatialUnit::Jurisdiction,
        SpatialUnit::ManagementUnit,
        SpatialUnit::Grid10,
        SpatialUnit::Geometry,
    ];

    /// Name used by the strata selector and the centroid lookup file.
    pub fn name(self) -> &'static str {
        match self {
            SpatialUnit::Lake => "lake",
            SpatialUnit::StateProvince => "stateProv",
            SpatialUnit::Jurisdiction => "jurisdiction",
            SpatialUnit::ManagementUnit => "mu",
            SpatialUnit::Grid10 => "grid10",
            SpatialUnit::Geometry => "geom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpatialUnit::Lake => "Lake",
            SpatialUnit::StateProvince => "State/Province",
            SpatialUnit::Jurisdiction => "Jurisdiction",
            SpatialUnit::ManagementUnit => "Management Unit",
            SpatialUnit::Grid10 => "10-minute Grid",
            SpatialUnit::Geometry => "Reported Point",
        }
    }

    /// The attribute whose values key this unit's markers.
    pub fn attribute(self) -> Attribute {
        match self {
            SpatialUnit::Lake => Attribute::Lake,
            SpatialUnit::StateProvince => Attribute::StateProv,
            SpatialUnit::Jurisdiction => Attribute::Jurisdiction,
            SpatialUnit::ManagementUnit => Attribute::ManUnit,
            SpatialUnit::Grid10 => Attribute::Grid10,
            SpatialUnit::Geometry => Attribute::Geom,
        }
    }

    /// Inverse of [`SpatialUnit::attribute`].
    pub fn for_attribute(attribute: Attribute) -> Option<SpatialUnit> {
        SpatialUnit::ALL
            .into_iter()
            .find(|unit| unit.attribute() == attribute)
    }
}

impl fmt::Display for SpatialUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpatialUnit {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SpatialUnit::ALL
            .into_iter()
            .find(|unit| unit.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KeyError::UnknownSpatialUnit(s.to_string()))
    }
}

impl TryFrom<String> for SpatialUnit {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpatialUnit> for String {
    fn from(value: SpatialUnit) -> Self {
        value.name().to_string()
    }
}
