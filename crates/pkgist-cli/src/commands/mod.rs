//! CLI commands for pkgist.

pub mod endpoints;
pub mod list;
pub mod notify;
pub mod ping;
pub mod search;
pub mod show;

use clap::{Parser, Subcommand};

/// pkgist - query and notify the Packagist registry
#[derive(Parser, Debug)]
#[command(name = "pkgist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Registry base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// User agent sent with every request
    #[arg(long, global = true, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip endpoint discovery and use the built-in paths
    #[arg(long, global = true)]
    pub no_ping: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the registry root and show the endpoints it advertises
    Ping,

    /// Show the endpoint templates currently in use, without network access
    Endpoints,

    /// Show package metadata
    Show(show::ShowArgs),

    /// List all package names
    List(list::ListArgs),

    /// Search for packages
    Search(search::SearchArgs),

    /// Report an install of one package
    Notify(notify::NotifyArgs),

    /// Report installs of several packages in one request
    #[command(name = "notify-batch")]
    NotifyBatch(notify::NotifyBatchArgs),
}
