use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use enrich_cli::cli::RootArgs;
use enrich_cli::{commands, config};
use enrich_logging::{enrich_info, enrich_warn, DEFAULT_LOG_FILE};
use log::LevelFilter;

fn main() -> Result<()> {
    let args = RootArgs::parse();

    let loaded = config::load(&args.global.config);
    let mut config = loaded.as_ref().ok().cloned().unwrap_or_default();
    args.global.apply_to(&mut config);

    let level = if args.global.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    enrich_logging::initialize(config.log_output.into(), level, Path::new(DEFAULT_LOG_FILE));
    if let Err(err) = &loaded {
        enrich_warn!("Using default configuration: {}", err);
    }
    enrich_info!("Starting enrich base_url={}", config.base_url);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime.block_on(commands::dispatch(
        args.command,
        config.client_settings(),
        &config.output_dir,
    ))
}
