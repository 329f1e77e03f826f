//! Loading a dataset into a coordinator and applying command-line filters.

use crate::DataArgs;
use anyhow::{anyhow, bail, Context};
use fsd_core::centroids::Centroids;
use fsd_core::event::StockingEvent;
use fsd_core::loader::{fetch_events, load_events_csv, load_events_json};
use fsd_core::Attribute;
use fsd_xf::{Coordinator, DashboardConfig};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Build a coordinator from `args` with every requested filter applied.
pub async fn open(args: &DataArgs, centroids: Option<&str>) -> anyhow::Result<Coordinator> {
    let events = load(args).await?;
    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path))?;
            DashboardConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config {}", path))?
        }
        None => DashboardConfig::default(),
    };

    let mut xf = Coordinator::new(events, config);
    if let Some(path) = centroids {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read centroids {}", path))?;
        let centroids = Centroids::from_json(&json)
            .with_context(|| format!("Failed to parse centroids {}", path))?;
        xf = xf.with_centroids(centroids);
    }
    apply_filters(&mut xf, args)?;
    Ok(xf)
}

async fn load(args: &DataArgs) -> anyhow::Result<Vec<StockingEvent>> {
    if let Some(url) = &args.url {
        info!("Fetching stocking events from {}", url);
        let client = reqwest::Client::new();
        return Ok(fetch_events(&client, url).await?);
    }
    let path = args
        .data
        .as_deref()
        .ok_or_else(|| anyhow!("either --data or --url is required"))?;
    let body = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    load_file(path, &body)
}

/// Parse `body` according to the extension of `path`.
fn load_file(path: &str, body: &str) -> anyhow::Result<Vec<StockingEvent>> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let events = match ext.as_deref() {
        Some("json") => load_events_json(body)?,
        Some("csv") => load_events_csv(body)?,
        _ => bail!("Unsupported data file {} (expected .json or .csv)", path),
    };
    Ok(events)
}

/// Split `key=a,b,c` into the attribute and its values.
pub fn parse_assignment(arg: &str) -> anyhow::Result<(Attribute, Vec<String>)> {
    let (key, values) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got {:?}", arg))?;
    let attribute: Attribute = key.trim().parse()?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Ok((attribute, values))
}

/// Apply `--clear`, then `--keep`, then `--drop`.
pub fn apply_filters(xf: &mut Coordinator, args: &DataArgs) -> anyhow::Result<()> {
    for key in &args.clear {
        let attribute: Attribute = key.trim().parse()?;
        debug!("Clearing {}", attribute);
        xf.clear_filter(attribute)?;
    }
    for arg in &args.keep {
        let (attribute, values) = parse_assignment(arg)?;
        debug!("Keeping {:?} for {}", values, attribute);
        xf.change_filter(attribute, values)?;
    }
    for arg in &args.drop {
        let (attribute, values) = parse_assignment(arg)?;
        for value in values {
            debug!("Dropping {} from {}", value, attribute);
            xf.uncheck(attribute, &value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS_JSON: &str = r#"[
        {"lake":"ER","stateprov":"ON","species_name":"Walleye","events":2,"yreq":1000,"total_stocked":50000},
        {"lake":"ER","stateprov":"OH","species_name":"Lake Trout","events":1,"yreq":500,"total_stocked":10000},
        {"lake":"HU","stateprov":"ON","species_name":"Walleye","events":3,"yreq":1500,"total_stocked":75000}
    ]"#;

    fn coordinator() -> Coordinator {
        let events = load_file("events.json", EVENTS_JSON).unwrap();
        Coordinator::new(events, DashboardConfig::default())
    }

    #[test]
    fn test_parse_assignment() {
        let (attribute, values) = parse_assignment("lake=ER, HU").unwrap();
        assert_eq!(attribute, Attribute::Lake);
        assert_eq!(values, vec!["ER", "HU"]);

        let (attribute, values) = parse_assignment("species=").unwrap();
        assert_eq!(attribute, Attribute::Species);
        assert!(values.is_empty());
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(parse_assignment("lake").is_err());
        assert!(parse_assignment("colour=red").is_err());
    }

    #[test]
    fn test_load_file_by_extension() {
        assert_eq!(load_file("events.JSON", EVENTS_JSON).unwrap().len(), 3);
        let csv = "lake,species_name,events\nSU,Coho Salmon,1\n";
        assert_eq!(load_file("events.csv", csv).unwrap()[0].lake, "SU");
        assert!(load_file("events.txt", EVENTS_JSON).is_err());
    }

    #[test]
    fn test_apply_filters() {
        let mut xf = coordinator();
        let args = DataArgs {
            keep: vec!["lake=ER".to_string()],
            drop: vec!["stateProv=OH".to_string()],
            ..Default::default()
        };
        apply_filters(&mut xf, &args).unwrap();
        let stats = xf.stats();
        assert_eq!(stats.event_count, 2);
        assert_eq!(stats.yreq_stocked, 1000);
    }

    #[test]
    fn test_apply_clear() {
        let mut xf = coordinator();
        let args = DataArgs {
            clear: vec!["lake".to_string()],
            ..Default::default()
        };
        apply_filters(&mut xf, &args).unwrap();
        assert_eq!(xf.stats().event_count, 0);
    }
}
