//! Client for the Packagist package registry API.
//!
//! The crate covers the registry's small public surface:
//!
//! - **Metadata**: a single package's metadata and the full package list.
//! - **Search**: full-text search with tag and type filters.
//! - **Download notifications**: single and batched install reports.
//! - **Endpoint discovery**: `ping` reads the registry root and adopts the
//!   endpoint paths it advertises, so mirrors and private registries with
//!   different layouts work without configuration.
//!
//! Requests go through a [`Transport`]; [`ReqwestTransport`] is the default
//! and tests can substitute their own.
//!
//! ## Example
//!
//! ```no_run
//! use pkgist_client::{ClientConfig, PackagistClient};
//!
//! # async fn example() -> pkgist_client::Result<()> {
//! let config = ClientConfig::from_env()?.with_user_agent("my-installer/1.0")?;
//! let client = PackagistClient::with_config(config)?;
//!
//! let packages = client.list_package_names().await?;
//! println!("{} packages on Packagist", packages.len());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod endpoint;
pub mod error;
pub mod packagist;
pub mod transport;

pub use config::{ClientConfig, ConfigEnvVar, DEFAULT_USER_AGENT, PACKAGIST_URL};
pub use endpoint::{Endpoint, EndpointParams, EndpointTemplates, Placeholder, ResolvedPath};
pub use error::{ClientError, Result};
pub use packagist::{PackagistClient, RequestOptions, SearchResult};
pub use transport::{
    ReqwestTransport, Transport, TransportFuture, TransportRequest, TransportResponse,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create a client for packagist.org configured from the environment.
///
/// # Errors
/// Returns error if the environment holds invalid settings or the
/// transport cannot be built.
pub fn packagist() -> Result<PackagistClient> {
    PackagistClient::with_config(ClientConfig::from_env()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_client() {
        let client = PackagistClient::new().unwrap();
        assert_eq!(client.base_url().host_str(), Some("packagist.org"));
        assert_eq!(
            client.templates().get("package").unwrap(),
            "/p/{{package}}.json"
        );
    }
}
