//! pkgist - command-line access to the Packagist registry API.
//!
//! Looks up package metadata, searches the registry and reports installs,
//! one HTTP request per operation.

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod context;
mod output;

use clap::Parser;
use commands::{Cli, Commands};
use context::Context;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 if cli.quiet => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let ctx = match Context::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            output::error(&format!("Failed to initialize: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            output::error(&format!("Failed to start runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_command(&cli, &ctx)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run_command(cli: &Cli, ctx: &Context) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Ping => commands::ping::run(ctx).await,
        Commands::Endpoints => commands::endpoints::run(ctx),
        Commands::Show(args) => commands::show::run(ctx, args).await,
        Commands::List(args) => commands::list::run(ctx, args).await,
        Commands::Search(args) => commands::search::run(ctx, args).await,
        Commands::Notify(args) => commands::notify::run(ctx, args).await,
        Commands::NotifyBatch(args) => commands::notify::run_batch(ctx, args).await,
    }
}
