//! Plain-text renderings of the dashboard panels.

use fsd_core::Attribute;
use fsd_utils::format::comma_format;
use fsd_xf::models::{CheckboxPanel, SpatialPoint, StatsPanel};
use fsd_xf::Coordinator;

pub fn print_stats(xf: &Coordinator) {
    print!("{}", format_stats(&xf.stats()));
}

pub fn print_panel(xf: &Coordinator, key: Attribute) -> anyhow::Result<()> {
    print!("{}", format_panel(&xf.checkbox_panel(key)?));
    Ok(())
}

pub fn print_map(xf: &Coordinator, json: bool) -> anyhow::Result<()> {
    let points = xf.current_spatial_snapshot()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        print!("{}", format_map(&points));
    }
    Ok(())
}

pub fn format_stats(stats: &StatsPanel) -> String {
    let mut out = String::new();
    out.push_str(&format!("Species:        {}\n", stats.species_count));
    out.push_str(&format!("Events:         {}\n", comma_format(stats.event_count)));
    out.push_str(&format!("Fish stocked:   {}\n", comma_format(stats.total_stocked)));
    out.push_str(&format!("YREQ stocked:   {}\n", comma_format(stats.yreq_stocked)));
    if !stats.rows.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "{:<24} {:>8} {:>14} {:>14}\n",
            "Species", "Events", "YREQ", "Stocked"
        ));
        for row in &stats.rows {
            out.push_str(&format!(
                "{:<24} {:>8} {:>14} {:>14}\n",
                row.species,
                comma_format(row.events),
                comma_format(row.yreq),
                comma_format(row.total)
            ));
        }
    }
    out
}

pub fn format_panel(panel: &CheckboxPanel) -> String {
    let mut out = format!("{}\n", panel.label);
    for entry in &panel.entries {
        let mark = if entry.checked { 'x' } else { ' ' };
        out.push_str(&format!(
            "[{}] {} ({})\n",
            mark,
            entry.label,
            comma_format(entry.value)
        ));
    }
    out
}

pub fn format_map(points: &[SpatialPoint]) -> String {
    let mut out = String::new();
    for point in points {
        let at = match point.coordinates {
            Some((lon, lat)) => format!("{:.4}, {:.4}", lon, lat),
            None => "-".to_string(),
        };
        out.push_str(&format!("{} [{}] {}\n", point.key, at, comma_format(point.total)));
        for slice in point.ranked_slices() {
            out.push_str(&format!("    {:<24} {:>14}\n", slice.slice, comma_format(slice.value)));
        }
    }
    out
}
