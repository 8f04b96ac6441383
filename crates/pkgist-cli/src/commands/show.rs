//! Show command implementation.

use crate::context::Context;
use crate::output;
use anyhow::Result;
use clap::Args;
use console::style;
use pkgist_core::PackageName;
use tracing::info;

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Package name (vendor/name)
    pub package: PackageName,
}

/// Run the show command.
pub async fn run(ctx: &Context, args: &ShowArgs) -> Result<()> {
    info!(package = %args.package, "running show command");

    ctx.discover().await;

    match ctx.client.get_package(&args.package.full_name()).await? {
        Some(metadata) => output::json(&metadata)?,
        None => println!(
            "{} {}",
            style("No metadata returned for").dim(),
            style(&args.package).yellow()
        ),
    }

    Ok(())
}
