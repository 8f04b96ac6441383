//! List command implementation.

use crate::context::Context;
use anyhow::Result;
use clap::Args;
use console::style;
use tracing::info;

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show names containing this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Run the list command.
pub async fn run(ctx: &Context, args: &ListArgs) -> Result<()> {
    info!(filter = ?args.filter, "running list command");

    ctx.discover().await;

    let names = ctx.client.list_package_names().await?;
    let filter = args.filter.as_deref().map(str::to_lowercase);

    let mut shown = 0usize;
    for name in names
        .iter()
        .filter(|n| filter.as_ref().is_none_or(|f| n.to_lowercase().contains(f)))
    {
        println!("{name}");
        shown += 1;
    }

    if shown == 0 && !ctx.quiet {
        println!("{}", style("No packages found").dim());
    }

    Ok(())
}
