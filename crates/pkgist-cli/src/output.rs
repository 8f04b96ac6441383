//! Terminal output helpers.

use anyhow::Result;
use console::style;
use sonic_rs::Value;

/// Print an error line to stderr.
pub fn error(message: &str) {
    eprintln!("{} {message}", style("error:").red().bold());
}

/// Print a warning line to stderr.
pub fn warning(message: &str) {
    eprintln!("{} {message}", style("warning:").yellow().bold());
}

/// Print a success line unless quiet.
pub fn success(quiet: bool, message: &str) {
    if !quiet {
        println!("{} {message}", style("✓").green().bold());
    }
}

/// Pretty-print a JSON document to stdout.
pub fn json(value: &Value) -> Result<()> {
    println!("{}", sonic_rs::to_string_pretty(value)?);
    Ok(())
}
