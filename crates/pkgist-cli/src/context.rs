//! CLI context shared across commands.

use crate::commands::Cli;
use crate::output;
use anyhow::{Context as _, Result};
use pkgist_client::{ClientConfig, PackagistClient};
use std::time::Duration;
use tracing::debug;

/// Global CLI context shared across all commands.
#[derive(Debug)]
pub struct Context {
    /// Registry client.
    pub client: PackagistClient,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Skip endpoint discovery.
    pub no_ping: bool,
}

impl Context {
    /// Create a context from CLI arguments.
    ///
    /// Flags override environment variables, which override defaults.
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = ClientConfig::from_env().context("invalid environment configuration")?;

        if let Some(url) = &cli.base_url {
            config = config
                .with_base_url(url)
                .with_context(|| format!("invalid --base-url '{url}'"))?;
        }
        if let Some(ua) = &cli.user_agent {
            config = config
                .with_user_agent(ua.clone())
                .with_context(|| format!("invalid --user-agent '{ua}'"))?;
        }
        if let Some(secs) = cli.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        debug!(base_url = %config.base_url, user_agent = %config.user_agent, "client configured");

        let client = PackagistClient::with_config(config)?;

        Ok(Self {
            client,
            quiet: cli.quiet,
            no_ping: cli.no_ping,
        })
    }

    /// Adopt the registry's advertised endpoints before a request.
    ///
    /// A failed discovery falls back to the built-in endpoints.
    pub async fn discover(&self) {
        if self.no_ping {
            return;
        }
        if let Err(e) = self.client.ping().await {
            output::warning(&format!("endpoint discovery failed, using defaults: {e}"));
        }
    }
}
