//! Dataset loading for stocking events.
//!
//! # Formats
//!
//! - **JSON**: an array of row objects, as returned by the stocking API
//!   (`[{"lake": "HU", "species_name": "Lake Trout", "yreq": 5000, ...}, ...]`)
//! - **CSV** (has headers): the same field names as columns, in any order.
//!   Unknown columns are ignored; missing columns are treated as missing values.
//!
//! Every row is passed through [`StockingEvent::normalize`], so a row with a
//! bad value never aborts the load.

use crate::error::LoadError;
use crate::event::{Loose, RawEvent, StockingEvent};

#[cfg(feature = "api")]
use log::{info, warn};
#[cfg(feature = "api")]
use reqwest::{Client, StatusCode};
#[cfg(feature = "api")]
use std::time::Duration;

/// Parse a JSON array of raw rows and normalize them.
pub fn load_events_json(json: &str) -> Result<Vec<StockingEvent>, LoadError> {
    let raw: Vec<RawEvent> = serde_json::from_str(json)?;
    let events: Vec<StockingEvent> = raw.iter().map(StockingEvent::normalize).collect();
    log::info!("loader: Loaded {} stocking events from JSON", events.len());
    Ok(events)
}

/// Parse a headered CSV of raw rows and normalize them.
pub fn load_events_csv(csv_data: &str) -> Result<Vec<StockingEvent>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());
    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let columns = RawColumns {
        lake: column("lake"),
        stateprov: column("stateprov"),
        agency_abbrev: column("agency_abbrev"),
        jurisdiction_slug: column("jurisdiction_slug"),
        man_unit: column("man_unit"),
        grid10: column("grid10"),
        geom: column("geom"),
        species_name: column("species_name"),
        strain: column("strain"),
        year_class: column("year_class"),
        life_stage: column("life_stage"),
        mark: column("mark"),
        month: column("month"),
        stk_method: column("stk_method"),
        events: column("events"),
        yreq: column("yreq"),
        total_stocked: column("total_stocked"),
        dd_lon: column("dd_lon"),
        dd_lat: column("dd_lat"),
    };

    let mut events = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let raw = columns.read(&record);
        events.push(StockingEvent::normalize(&raw));
    }
    log::info!("loader: Loaded {} stocking events from CSV", events.len());
    Ok(events)
}

/// Column positions of the raw fields in a CSV header.
struct RawColumns {
    lake: Option<usize>,
    stateprov: Option<usize>,
    agency_abbrev: Option<usize>,
    jurisdiction_slug: Option<usize>,
    man_unit: Option<usize>,
    grid10: Option<usize>,
    geom: Option<usize>,
    species_name: Option<usize>,
    strain: Option<usize>,
    year_class: Option<usize>,
    life_stage: Option<usize>,
    mark: Option<usize>,
    month: Option<usize>,
    stk_method: Option<usize>,
    events: Option<usize>,
    yreq: Option<usize>,
    total_stocked: Option<usize>,
    dd_lon: Option<usize>,
    dd_lat: Option<usize>,
}

impl RawColumns {
    fn read(&self, record: &csv::StringRecord) -> RawEvent {
        // Empty cells are missing values, same as JSON null.
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Loose::Text(s.to_string()))
        };
        RawEvent {
            lake: cell(self.lake),
            stateprov: cell(self.stateprov),
            agency_abbrev: cell(self.agency_abbrev),
            jurisdiction_slug: cell(self.jurisdiction_slug),
            man_unit: cell(self.man_unit),
            grid10: cell(self.grid10),
            geom: cell(self.geom),
            species_name: cell(self.species_name),
            strain: cell(self.strain),
            year_class: cell(self.year_class),
            life_stage: cell(self.life_stage),
            mark: cell(self.mark),
            month: cell(self.month),
            stk_method: cell(self.stk_method),
            events: cell(self.events),
            yreq: cell(self.yreq),
            total_stocked: cell(self.total_stocked),
            dd_lon: cell(self.dd_lon),
            dd_lat: cell(self.dd_lat),
        }
    }
}

/// Fetch and normalize the event JSON from the stocking API, with retry and
/// exponential backoff.
#[cfg(feature = "api")]
pub async fn fetch_events(client: &Client, url: &str) -> Result<Vec<StockingEvent>, LoadError> {
    let max_tries = 3;
    let mut sleep_millis: u64 = 1000;

    for attempt in 1..=max_tries {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status() != StatusCode::OK {
                    warn!(
                        "Attempt {}/{}: Bad response status for {}: {}",
                        attempt,
                        max_tries,
                        url,
                        response.status()
                    );
                } else {
                    match response.text().await {
                        Ok(body) => return load_events_json(&body),
                        Err(e) => {
                            warn!(
                                "Attempt {}/{}: Failed to read response body for {}: {}",
                                attempt, max_tries, url, e
                            );
                        }
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{}: Request failed for {}: {}",
                    attempt, max_tries, url, e
                );
            }
        }

        if attempt < max_tries {
            info!(
                "Sleeping for {} milliseconds before retry for {}",
                sleep_millis, url
            );
            tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
            sleep_millis *= 2;
        }
    }

    warn!("All attempts failed for {}", url);
    Err(LoadError::Fetch {
        url: url.to_string(),
        attempts: max_tries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS_JSON: &str = r#"[
        {"lake":"ER","species_name":"Walleye","events":2,"yreq":1000,"total_stocked":50000},
        {"lake":"ER","species_name":"Lake Trout","events":1,"yreq":"500","total_stocked":10000},
        {"lake":"HU","species_name":"Walleye","events":3,"yreq":1500,"total_stocked":"bad"}
    ]"#;

    #[test]
    fn test_load_events_json() {
        let events = load_events_json(EVENTS_JSON).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].yreq, 500);
        assert_eq!(events[2].total_stocked, 0);
        assert_eq!(events[2].mark, "None");
    }

    #[test]
    fn test_load_events_json_rejects_non_array() {
        assert!(matches!(
            load_events_json(r#"{"lake":"ER"}"#),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_load_events_csv() {
        let csv_data = "\
lake,species_name,year_class,events,yreq,total_stocked,dd_lon,dd_lat,extra
ER,Walleye,2019,2,1000,50000,-81.2,42.1,x
HU,Lake Trout,,1,abc,10000,,,y
";
        let events = load_events_csv(csv_data).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].year_class, "2019");
        assert_eq!(events[0].point, Some((-81.2, 42.1)));
        assert_eq!(events[1].year_class, "Unkn");
        assert_eq!(events[1].yreq, 0);
        assert_eq!(events[1].point, None);
        assert_eq!(events[1].agency, "None");
    }

    #[test]
    fn test_load_empty_csv() {
        let events = load_events_csv("lake,species_name\n").unwrap();
        assert!(events.is_empty());
    }
}
