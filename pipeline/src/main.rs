use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shelfcast_pipeline::{config::Args, run, PipelineConfig};

fn main() -> Result<()> {
    // stdout carries the progress lines, diagnostics go to stderr
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("shelfcast=warn"))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = PipelineConfig::from(Args::parse());
    run(&config)?;

    Ok(())
}
