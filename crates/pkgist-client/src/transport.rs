//! HTTP transport abstraction.
//!
//! The client never talks to the network itself: it hands a fully shaped
//! [`TransportRequest`] to a [`Transport`] and gets the raw status and body
//! back. [`ReqwestTransport`] is the production implementation.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, trace};
use url::Url;

/// Future returned by [`Transport::send`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + 'a>>;

/// A request ready to go over the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including query string.
    pub url: Url,
    /// Final header set.
    pub headers: HeaderMap,
    /// Request body, if any.
    pub body: Option<Bytes>,
}

/// Raw response from the transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// A 200 response with the given body.
    #[must_use]
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Performs HTTP requests on behalf of the client.
///
/// Implementations return `Err` only when no response was obtained at all;
/// any status code, successful or not, comes back as a response.
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send one request.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] if the service cannot be reached.
    fn send(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// Transport backed by a pooled reqwest client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("client", &"reqwest::Client")
            .finish()
    }
}

impl ReqwestTransport {
    /// Build a transport honouring the config's timeout.
    ///
    /// # Errors
    /// Returns error if the client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .tcp_nodelay(true)
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
        } = request;

        trace!(method = %method, url = %url, "sending request");

        let mut builder = self.client.request(method.clone(), url.as_str()).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(method = %method, url = %url, error = %e, "request failed");
                return Err(ClientError::transport(url.as_str(), e.to_string()));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(method = %method, url = %url, status = %status, bytes = body.len(), "request completed");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
        Box::pin(self.execute(request))
    }
}
