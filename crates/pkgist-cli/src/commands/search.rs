//! Search command implementation.

use crate::context::Context;
use anyhow::Result;
use clap::Args;
use console::style;
use tracing::info;

/// Arguments for the search command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Filter by tag (repeatable)
    #[arg(short = 'T', long = "tag")]
    pub tags: Vec<String>,

    /// Search type (library, project, etc.)
    #[arg(short = 't', long = "type")]
    pub package_type: Option<String>,

    /// Only show package names
    #[arg(short = 'N', long)]
    pub only_name: bool,
}

/// Run the search command.
pub async fn run(ctx: &Context, args: &SearchArgs) -> Result<()> {
    info!(query = %args.query, tags = ?args.tags, "running search command");

    if !ctx.quiet && !args.only_name {
        println!(
            "{} Searching for '{}'...",
            style("pkgist").cyan().bold(),
            style(&args.query).yellow()
        );
    }

    ctx.discover().await;

    let results = ctx
        .client
        .search_results(&args.query, &args.tags, args.package_type.as_deref())
        .await?;

    if results.is_empty() {
        println!("{}", style("No packages found").dim());
        return Ok(());
    }

    if !args.only_name {
        println!();
    }
    for result in &results {
        if args.only_name {
            println!("{}", result.name);
            continue;
        }
        println!(
            "{} {}",
            style(&result.name).green().bold(),
            style(format!("({} downloads)", result.downloads)).dim()
        );
        if let Some(replacement) = result.abandoned.replacement() {
            println!("  {} use {replacement}", style("abandoned:").red());
        } else if result.abandoned.is_abandoned() {
            println!("  {}", style("abandoned").red());
        }
        if !result.description.is_empty() {
            println!("  {}", result.description);
        }
    }

    Ok(())
}
