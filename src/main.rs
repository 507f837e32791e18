use clap::Parser;
use metobs_collector::cli::{run, Cli};
use metobs_collector::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
