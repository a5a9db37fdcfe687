//! bleeding-edge-bot binary

mod cli;

use anyhow::Context;
use bleeding_edge_bot::RunOptions;
use bleeding_edge_bot::config::Config;
use bleeding_edge_bot::logging;
use clap::Parser;
use cli::Cli;
use cli::context::CommandContext;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()).context("failed to load configuration") {
        Ok(config) => config,
        Err(e) => {
            anstream::eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.logging, &config.work_dir, cli.verbose) {
        anstream::eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    let options = RunOptions {
        dry_run: cli.dry_run,
        force: cli.force,
    };

    match run(config, options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, options: RunOptions) -> anyhow::Result<()> {
    let ctx = CommandContext::new(config).context("invalid configuration")?;
    cli::run::run_bot(&ctx, options)
        .await
        .context("run aborted")?;
    Ok(())
}
