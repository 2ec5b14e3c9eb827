//! streamcue - companion daemon entry point

use clap::Parser;
use std::path::PathBuf;
use streamcue_runtime::Orchestrator;

#[derive(Parser)]
#[command(
    name = "streamcue",
    about = "Companion daemon - republishes live client state for external tools"
)]
struct Cli {
    /// Base directory for settings, database and output artifacts
    #[arg(long)]
    base_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let mut orchestrator = Orchestrator::new(&base_dir)?;
    let plan = streamcue_modules::boot_plan(orchestrator.hub().clone());
    if let Err(e) = orchestrator.start(plan).await {
        eprintln!("boot failed: {e}");
        std::process::exit(1);
    }

    tokio::signal::ctrl_c().await?;
    orchestrator.exit().await;
    Ok(())
}
