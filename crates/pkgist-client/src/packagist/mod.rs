//! Packagist registry integration.
//!
//! # Example
//!
//! ```no_run
//! use pkgist_client::packagist::PackagistClient;
//! use pkgist_core::PackageDescriptor;
//!
//! # async fn example() -> pkgist_client::Result<()> {
//! let client = PackagistClient::new()?;
//!
//! // Adopt the endpoints the registry advertises
//! client.ping().await?;
//!
//! if let Some(metadata) = client.get_package("monolog/monolog").await? {
//!     println!("{metadata:?}");
//! }
//!
//! for result in client.search_results("logger", &["psr-3"], None).await? {
//!     println!("{}: {}", result.name, result.description);
//! }
//!
//! client
//!     .notify_batch(&[PackageDescriptor::new("monolog/monolog", "3.5.0")])
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod types;

pub use client::{PackagistClient, RequestOptions};
pub use types::{
    AbandonedValue, NotifyBatchRequest, PackageListResponse, SearchResponse,
    SearchResult,
};
