//! Notify and notify-batch command implementations.

use crate::context::Context;
use crate::output;
use anyhow::Result;
use clap::Args;
use pkgist_core::{PackageDescriptor, PackageName};
use tracing::info;

/// Arguments for the notify command.
#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// Package name (vendor/name)
    pub package: PackageName,
}

/// Arguments for the notify-batch command.
#[derive(Args, Debug)]
pub struct NotifyBatchArgs {
    /// Packages as vendor/name or vendor/name:version
    #[arg(required = true, value_parser = parse_descriptor)]
    pub packages: Vec<PackageDescriptor>,
}

fn parse_descriptor(s: &str) -> std::result::Result<PackageDescriptor, String> {
    PackageDescriptor::parse(s).map_err(|e| e.to_string())
}

/// Run the notify command.
pub async fn run(ctx: &Context, args: &NotifyArgs) -> Result<()> {
    info!(package = %args.package, "running notify command");

    ctx.discover().await;

    let response = ctx.client.notify(&args.package.full_name()).await?;
    output::success(ctx.quiet, &format!("Reported install of {}", args.package));
    if let Some(response) = response {
        info!(response = ?response, "registry response");
    }

    Ok(())
}

/// Run the notify-batch command.
pub async fn run_batch(ctx: &Context, args: &NotifyBatchArgs) -> Result<()> {
    info!(count = args.packages.len(), "running notify-batch command");

    ctx.discover().await;

    let response = ctx.client.notify_batch(&args.packages).await?;
    output::success(
        ctx.quiet,
        &format!("Reported {} install(s)", args.packages.len()),
    );
    if let Some(response) = response {
        info!(response = ?response, "registry response");
    }

    Ok(())
}
