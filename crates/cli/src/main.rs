mod args;
mod boot;
mod remote;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};

use merger::{ConfigError, MergeConfig, MergeError};

use crate::args::CliArgs;
use crate::remote::RemoteCache;

const EXIT_OUTPUT_ERROR: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Phase 1: Basic tracing so we can log during config loading
    let mut basic_tracing = Some(boot::init_tracing_basic());

    match try_main(args, &mut basic_tracing) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn try_main(args: CliArgs, basic_tracing: &mut Option<tracing::subscriber::DefaultGuard>) -> Result<()> {
    let mut config = MergeConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("Configuration validation failed")?;

    // Phase 2: Re-initialize tracing with the configured level.
    // Phase 1 stays active until here so config errors still get reported.
    drop(basic_tracing.take());
    boot::init_tracing(&config.log_level);

    let sources = args.sources();
    if sources.is_empty() {
        warn!("No log files given");
        return Ok(());
    }

    let cache = RemoteCache::new(config.cache_dir());
    let stdout = std::io::stdout();

    match merger::run(&config, &sources, &cache, stdout.lock()) {
        Ok(summary) => {
            info!(
                "Merged {} entries from {} sources ({} skipped)",
                summary.entries_written, summary.sources_merged, summary.sources_skipped
            );
            Ok(())
        }
        Err(e) if e.is_broken_pipe() => {
            debug!("Output closed early");
            Ok(())
        }
        Err(e) => Err(e).context("Merge failed"),
    }
}

fn exit_code(e: &anyhow::Error) -> u8 {
    if e.downcast_ref::<ConfigError>().is_some() {
        return EXIT_CONFIG_ERROR;
    }
    match e.downcast_ref::<MergeError>() {
        Some(MergeError::Config(_)) => EXIT_CONFIG_ERROR,
        _ => EXIT_OUTPUT_ERROR,
    }
}
