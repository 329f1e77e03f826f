//! FSD CLI - filter stocking events and print dashboard panels.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "fsd-cli",
    version,
    about = "Great Lakes fish stocking dashboard toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: fsd_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("fsd-cli starting");
    fsd_cmd::run(cli.command).await
}
