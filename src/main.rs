use anyhow::Result;
use clap::Parser;
use colored::*;
use defang_seo::cli::Cli;
use defang_seo::config::Config;
use defang_seo::run;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn load_args() -> Result<Cli> {
    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => Some(Config::from_file(Path::new(path))?),
        None => Config::from_default_paths()?,
    };

    Ok(match config {
        Some(config) => config.merge_with_cli(&args),
        None => args,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match load_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
            std::process::exit(1);
        }
    };

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
