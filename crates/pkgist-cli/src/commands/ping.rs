//! Ping command implementation.

use crate::context::Context;
use anyhow::Result;
use console::style;
use tracing::info;

/// Run the ping command.
pub async fn run(ctx: &Context) -> Result<()> {
    info!(base_url = %ctx.client.base_url(), "running ping command");

    match ctx.client.ping().await? {
        Some(_) => {
            if !ctx.quiet {
                println!(
                    "{} {} is reachable",
                    style("pkgist").cyan().bold(),
                    style(ctx.client.base_url()).yellow()
                );
                println!();
            }
            super::endpoints::print_table(&ctx.client);
        }
        None => {
            println!("{}", style("Registry returned no endpoint data").dim());
        }
    }

    Ok(())
}
