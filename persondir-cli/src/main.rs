//! persondir command line
//!
//! Loads a directory configuration and runs one lookup against it, printing
//! the result as JSON on stdout.
//!
//! Usage:
//!   persondir --config persondir.toml resolve edalquist
//!   persondir --config persondir.toml query mail=eric@example.edu
//!   persondir --config persondir.toml names

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use persondir_cli::{execute, Command};
use persondir_engine::DirectoryConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "persondir")]
#[command(about = "Resolve person attributes from a configured directory")]
struct Args {
    /// Path to the directory configuration
    #[arg(short, long, default_value = "persondir.toml")]
    config: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = DirectoryConfig::load_from(&args.config)
        .with_context(|| format!("Failed to load configuration from {:?}", args.config))?;
    let directory = config.build().context("Failed to build directory")?;
    info!("Directory {} ready", directory.name());

    let output = execute(directory.as_ref(), &config.default_attribute, &args.command)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);
    Ok(())
}
