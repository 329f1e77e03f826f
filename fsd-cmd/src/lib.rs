//! Command implementations for the FSD CLI.
//!
//! Each subcommand loads a dataset, applies the requested checkbox changes
//! through the coordinator, and prints one of the dashboard panels.

use clap::{Args, Subcommand};

pub mod dataset;
pub mod report;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Stocking events file (.json or .csv)
    #[arg(short = 'd', long, conflicts_with = "url", required_unless_present = "url")]
    pub data: Option<String>,

    /// Fetch stocking events JSON from this URL instead of a file
    #[arg(long)]
    pub url: Option<String>,

    /// Dashboard configuration JSON
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Check exactly these values for a filter key, e.g. `lake=ER,HU`
    #[arg(long, value_name = "KEY=VALUES")]
    pub keep: Vec<String>,

    /// Uncheck a single value, e.g. `species=Walleye`
    #[arg(long, value_name = "KEY=VALUE")]
    pub drop: Vec<String>,

    /// Uncheck every value of a filter key
    #[arg(long, value_name = "KEY")]
    pub clear: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the stats panel for the filtered events
    Stats {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Print the checkbox panel for one filter key
    Panel {
        #[command(flatten)]
        data: DataArgs,

        /// Filter key, e.g. `lake`, `species`, `stockingMonth`
        #[arg(short = 'k', long)]
        key: String,
    },

    /// Print the map markers at a spatial unit
    Map {
        #[command(flatten)]
        data: DataArgs,

        /// Spatial unit: lake, stateProv, jurisdiction, mu, grid10 or geom
        #[arg(short = 'u', long)]
        unit: Option<String>,

        /// Centroid lookup JSON for polygon-based units
        #[arg(long)]
        centroids: Option<String>,

        /// Print markers as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Stats { data } => {
            let xf = dataset::open(&data, None).await?;
            report::print_stats(&xf);
            Ok(())
        }
        Command::Panel { data, key } => {
            let xf = dataset::open(&data, None).await?;
            report::print_panel(&xf, key.parse()?)
        }
        Command::Map {
            data,
            unit,
            centroids,
            json,
        } => {
            let mut xf = dataset::open(&data, centroids.as_deref()).await?;
            if let Some(unit) = unit {
                xf.set_spatial_unit(unit.parse()?)?;
            }
            report::print_map(&xf, json)
        }
    }
}
