use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::KeyError;

/// Sentinel for a categorical field that was not reported.
pub const MISSING: &str = "None";

/// Sentinel for an unreported year class.
pub const UNKNOWN_YEAR_CLASS: &str = "Unkn";

/// Sentinel for an unreported stocking month.
pub const UNKNOWN_MONTH: &str = "0";

/// A loosely typed field value as it arrives from the data service.
///
/// The stocking API is not strict about types: year classes come back as
/// numbers or strings, counts occasionally as strings, and missing values as
/// `null`, `""` or `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Loose {
    /// Numeric coercion. `None` for anything that is not a finite number.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Loose::Int(i) => *i as f64,
            Loose::Float(f) => *f,
            Loose::Bool(_) => return None,
            Loose::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// Key coercion. Empty strings, zeros and `false` count as missing.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Loose::Int(0) | Loose::Bool(false) => None,
            Loose::Int(i) => Some(i.to_string()),
            Loose::Float(f) if *f == 0.0 || !f.is_finite() => None,
            Loose::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some((*f as i64).to_string()),
            Loose::Float(f) => Some(f.to_string()),
            Loose::Bool(true) => Some("true".to_string()),
            Loose::Text(s) if s.trim().is_empty() => None,
            Loose::Text(s) => Some(s.trim().to_string()),
        }
    }
}

/// A stocking event row exactly as loaded, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    pub lake: Option<Loose>,
    pub stateprov: Option<Loose>,
    pub agency_abbrev: Option<Loose>,
    pub jurisdiction_slug: Option<Loose>,
    pub man_unit: Option<Loose>,
    pub grid10: Option<Loose>,
    pub geom: Option<Loose>,
    pub species_name: Option<Loose>,
    pub strain: Option<Loose>,
    pub year_class: Option<Loose>,
    pub life_stage: Option<Loose>,
    pub mark: Option<Loose>,
    pub month: Option<Loose>,
    pub stk_method: Option<Loose>,
    pub events: Option<Loose>,
    pub yreq: Option<Loose>,
    pub total_stocked: Option<Loose>,
    pub dd_lon: Option<Loose>,
    pub dd_lat: Option<Loose>,
}

/// A normalized stocking event.
///
/// Every categorical field holds a defined value; the aggregation engine
/// uses these strings directly as group keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockingEvent {
    pub lake: String,
    pub stateprov: String,
    pub agency: String,
    pub jurisdiction: String,
    pub man_unit: String,
    pub grid10: String,
    pub geom: String,
    pub species: String,
    pub strain: String,
    pub year_class: String,
    pub life_stage: String,
    pub mark: String,
    pub month: String,
    pub stk_method: String,
    /// Number of stocking events this row stands for
    pub events: i64,
    /// Yearling equivalents, rounded to whole fish
    pub yreq: i64,
    pub total_stocked: i64,
    /// Reported location as (lon, lat)
    pub point: Option<(f64, f64)>,
}

fn key_or(value: &Option<Loose>, default: &str) -> String {
    value
        .as_ref()
        .and_then(Loose::as_key)
        .unwrap_or_else(|| default.to_string())
}

fn count_or_zero(value: &Option<Loose>) -> i64 {
    value
        .as_ref()
        .and_then(Loose::as_number)
        .map(|n| n.round() as i64)
        .unwrap_or(0)
}

impl From<RawEvent> for StockingEvent {
    fn from(raw: RawEvent) -> Self {
        StockingEvent::normalize(&raw)
    }
}

impl StockingEvent {
    /// Coerce a raw row into a canonical event. Never fails.
    ///
    /// Malformed counts become 0. An absent `events` column means the row is
    /// a single event. Missing categorical fields get a sentinel value.
    pub fn normalize(raw: &RawEvent) -> StockingEvent {
        let events = match &raw.events {
            None => 1,
            some => count_or_zero(some),
        };
        let lon = raw.dd_lon.as_ref().and_then(Loose::as_number);
        let lat = raw.dd_lat.as_ref().and_then(Loose::as_number);
        StockingEvent {
            lake: key_or(&raw.lake, MISSING),
            stateprov: key_or(&raw.stateprov, MISSING),
            agency: key_or(&raw.agency_abbrev, MISSING),
            jurisdiction: key_or(&raw.jurisdiction_slug, MISSING),
            man_unit: key_or(&raw.man_unit, MISSING),
            grid10: key_or(&raw.grid10, MISSING),
            geom: key_or(&raw.geom, MISSING),
            species: key_or(&raw.species_name, MISSING),
            strain: key_or(&raw.strain, MISSING),
            year_class: key_or(&raw.year_class, UNKNOWN_YEAR_CLASS),
            life_stage: key_or(&raw.life_stage, MISSING),
            mark: key_or(&raw.mark, MISSING),
            month: key_or(&raw.month, UNKNOWN_MONTH),
            stk_method: key_or(&raw.stk_method, MISSING),
            events,
            yreq: count_or_zero(&raw.yreq),
            total_stocked: count_or_zero(&raw.total_stocked),
            point: lon.zip(lat),
        }
    }

    /// The value of one categorical attribute.
    pub fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Lake => &self.lake,
            Attribute::StateProv => &self.stateprov,
            Attribute::Jurisdiction => &self.jurisdiction,
            Attribute::ManUnit => &self.man_unit,
            Attribute::Grid10 => &self.grid10,
            Attribute::Geom => &self.geom,
            Attribute::Agency => &self.agency,
            Attribute::Species => &self.species,
            Attribute::Strain => &self.strain,
            Attribute::YearClass => &self.year_class,
            Attribute::LifeStage => &self.life_stage,
            Attribute::Mark => &self.mark,
            Attribute::StockingMonth => &self.month,
            Attribute::StockingMethod => &self.stk_method,
        }
    }
}

/// The categorical attributes events are indexed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Attribute {
    Lake,
    StateProv,
    Jurisdiction,
    ManUnit,
    Grid10,
    Geom,
    Agency,
    Species,
    Strain,
    YearClass,
    LifeStage,
    Mark,
    StockingMonth,
    StockingMethod,
}

impl Attribute {
    pub const ALL: [Attribute; 14] = [
        Attribute::Lake,
        Attribute::StateProv,
        Attribute::Jurisdiction,
        Attribute::ManUnit,
        Attribute::Grid10,
        Attribute::Geom,
        Attribute::Agency,
        Attribute::Species,
        Attribute::Strain,
        Attribute::YearClass,
        Attribute::LifeStage,
        Attribute::Mark,
        Attribute::StockingMonth,
        Attribute::StockingMethod,
    ];

    /// Filter key used by the checkbox panels.
    pub fn key(self) -> &'static str {
        match self {
            Attribute::Lake => "lake",
            Attribute::StateProv => "stateProv",
            Attribute::Jurisdiction => "jurisdiction",
            Attribute::ManUnit => "manUnit",
            Attribute::Grid10 => "grid10",
            Attribute::Geom => "geom",
            Attribute::Agency => "agency",
            Attribute::Species => "species",
            Attribute::Strain => "strain",
            Attribute::YearClass => "yearClass",
            Attribute::LifeStage => "lifeStage",
            Attribute::Mark => "mark",
            Attribute::StockingMonth => "stockingMonth",
            Attribute::StockingMethod => "stkMeth",
        }
    }

    /// Panel heading.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Lake => "Lake",
            Attribute::StateProv => "State/Province",
            Attribute::Jurisdiction => "Jurisdiction",
            Attribute::ManUnit => "Management Unit",
            Attribute::Grid10 => "10-minute Grid",
            Attribute::Geom => "Reported Point",
            Attribute::Agency => "Agency",
            Attribute::Species => "Species",
            Attribute::Strain => "Strain",
            Attribute::YearClass => "Year Class",
            Attribute::LifeStage => "Life Stage",
            Attribute::Mark => "Mark",
            Attribute::StockingMonth => "Stocking Month",
            Attribute::StockingMethod => "Stocking Method",
        }
    }

    /// Position in [`Attribute::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Attribute {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| KeyError::UnknownAttribute(s.to_string()))
    }
}

impl TryFrom<String> for Attribute {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Attribute> for String {
    fn from(value: Attribute) -> Self {
        value.key().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from_json(json: &str) -> RawEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_complete_row() {
        let raw = raw_from_json(
            r#"{"lake":"HU","stateprov":"ON","agency_abbrev":"OMNR","jurisdiction_slug":"hu_on",
                "man_unit":"hu_mu_oh5","grid10":"hu_2015","geom":"Point(-81.5 44.9)",
                "species_name":"Lake Trout","strain":"SEN","year_class":2017,"life_stage":"y",
                "mark":"AD","month":5,"stk_method":"b","events":1,"yreq":5000.4,
                "total_stocked":"5000","dd_lon":-81.5,"dd_lat":44.9}"#,
        );
        let event = StockingEvent::normalize(&raw);
        assert_eq!(event.lake, "HU");
        assert_eq!(event.agency, "OMNR");
        assert_eq!(event.year_class, "2017");
        assert_eq!(event.month, "5");
        assert_eq!(event.yreq, 5000);
        assert_eq!(event.total_stocked, 5000);
        assert_eq!(event.events, 1);
        assert_eq!(event.point, Some((-81.5, 44.9)));
    }

    #[test]
    fn test_normalize_substitutes_sentinels() {
        let raw = raw_from_json(r#"{"lake":"ER","year_class":null,"mark":"","month":0}"#);
        let event = StockingEvent::normalize(&raw);
        assert_eq!(event.year_class, UNKNOWN_YEAR_CLASS);
        assert_eq!(event.mark, MISSING);
        assert_eq!(event.month, UNKNOWN_MONTH);
        assert_eq!(event.species, MISSING);
        assert_eq!(event.point, None);
        for attribute in Attribute::ALL {
            assert!(!event.attribute(attribute).is_empty(), "{attribute} is empty");
        }
    }

    #[test]
    fn test_normalize_coerces_bad_numbers_to_zero() {
        let raw = raw_from_json(r#"{"yreq":"lots","total_stocked":"n/a","events":"?"}"#);
        let event = StockingEvent::normalize(&raw);
        assert_eq!(event.yreq, 0);
        assert_eq!(event.total_stocked, 0);
        assert_eq!(event.events, 0);
    }

    #[test]
    fn test_missing_events_column_counts_as_one() {
        let event = StockingEvent::normalize(&RawEvent::default());
        assert_eq!(event.events, 1);
    }

    #[test]
    fn test_attribute_keys_round_trip() {
        for attribute in Attribute::ALL {
            assert_eq!(attribute.key().parse::<Attribute>().unwrap(), attribute);
        }
        assert_eq!("STKMETH".parse::<Attribute>().unwrap(), Attribute::StockingMethod);
        assert_eq!(
            "colour".parse::<Attribute>(),
            Err(KeyError::UnknownAttribute("colour".to_string()))
        );
    }

    #[test]
    fn test_attribute_index_matches_all() {
        for (i, attribute) in Attribute::ALL.into_iter().enumerate() {
            assert_eq!(attribute.index(), i);
        }
    }
}
