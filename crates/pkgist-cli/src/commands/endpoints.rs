//! Endpoints command implementation.

use crate::context::Context;
use anyhow::Result;
use console::style;
use pkgist_client::PackagistClient;

/// Run the endpoints command.
pub fn run(ctx: &Context) -> Result<()> {
    print_table(&ctx.client);
    Ok(())
}

/// Print each operation with its current template.
pub fn print_table(client: &PackagistClient) {
    let templates = client.templates();
    let width = templates.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, template) in templates.iter() {
        println!("{}  {template}", style(format!("{name:<width$}")).green());
    }
}
