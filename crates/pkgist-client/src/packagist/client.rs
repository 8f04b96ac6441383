//! Packagist API client.

use super::types::{NotifyBatchRequest, PackageListResponse, SearchResponse, SearchResult};
use crate::config::ClientConfig;
use crate::endpoint::{Endpoint, EndpointParams, EndpointTemplates, Placeholder, join_url};
use crate::error::{ClientError, Result};
use crate::transport::{ReqwestTransport, Transport, TransportRequest};
use bytes::Bytes;
use parking_lot::RwLock;
use pkgist_core::{PackageDescriptor, from_json_slice, is_empty_value, to_json};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use sonic_rs::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Shape of a single API request beyond its endpoint.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Extra query parameters appended to the URL.
    pub query: Vec<(String, String)>,
    /// Request body.
    pub body: Option<Bytes>,
    /// Header overrides; these win over every default.
    pub headers: HeaderMap,
}

impl RequestOptions {
    /// Options for `method` with nothing attached.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Options carrying the operation's default method.
    #[must_use]
    pub fn for_endpoint(endpoint: Endpoint) -> Self {
        Self::new(endpoint.method())
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body and its content type.
    #[must_use]
    pub fn with_json_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    /// Override a header.
    #[must_use]
    pub fn with_header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Client for the Packagist registry API.
///
/// Endpoint templates start from the built-in defaults and can be refreshed
/// from the registry with [`PackagistClient::ping`]. The template table sits
/// behind a lock that is never held across a request, so `ping` may run
/// alongside other calls.
pub struct PackagistClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    templates: RwLock<EndpointTemplates>,
}

impl std::fmt::Debug for PackagistClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackagistClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("user_agent", &self.config.user_agent)
            .field("transport", &self.transport)
            .finish()
    }
}

impl PackagistClient {
    /// Create a client for packagist.org.
    ///
    /// # Errors
    /// Returns error if the HTTP transport cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with the given configuration and the reqwest transport.
    ///
    /// # Errors
    /// Returns error if the HTTP transport cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            templates: RwLock::new(EndpointTemplates::default()),
        }
    }

    /// Client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Registry base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Snapshot of the current endpoint templates.
    #[must_use]
    pub fn templates(&self) -> EndpointTemplates {
        self.templates.read().clone()
    }

    /// Replace the template of a known operation.
    ///
    /// # Errors
    /// Returns [`ClientError::UnknownEndpoint`] if `name` is not registered.
    pub fn set_template(&self, name: &str, template: impl Into<String>) -> Result<()> {
        self.templates.write().set(name, template)
    }

    /// Resolve an operation to its full URL without sending anything.
    ///
    /// Query and type values are appended as `q` / `type` unless the
    /// template already embeds them.
    ///
    /// # Errors
    /// Returns error if the operation is unknown, a required value is
    /// missing, or the URL is malformed.
    pub fn endpoint_url(&self, name: &str, params: &EndpointParams<'_>) -> Result<Url> {
        let resolved = self.templates.read().resolve(name, params)?;
        let mut url = join_url(&self.config.base_url, &resolved.path)?;

        let mut extra = Vec::new();
        if let Some(query) = params.query
            && !resolved.consumed(Placeholder::Query)
        {
            extra.push(("q", query));
        }
        if let Some(package_type) = params.package_type
            && !resolved.consumed(Placeholder::Type)
        {
            extra.push(("type", package_type));
        }
        if !extra.is_empty() {
            url.query_pairs_mut().extend_pairs(extra);
        }

        Ok(url)
    }

    /// Fetch metadata for one package.
    ///
    /// # Errors
    /// Returns error if the request fails or the body is not JSON.
    pub async fn get_package(&self, name: &str) -> Result<Option<Value>> {
        self.request_value(
            Endpoint::Package.as_str(),
            &EndpointParams::package(name),
            RequestOptions::for_endpoint(Endpoint::Package),
        )
        .await
    }

    /// Fetch the list of all packages.
    ///
    /// # Errors
    /// Returns error if the request fails or the body is not JSON.
    pub async fn get_packages(&self) -> Result<Option<Value>> {
        self.request_value(
            Endpoint::Packages.as_str(),
            &EndpointParams::default(),
            RequestOptions::for_endpoint(Endpoint::Packages),
        )
        .await
    }

    /// Search packages by query and tags.
    ///
    /// # Errors
    /// Returns error if the request fails or the body is not JSON.
    pub async fn search<S: AsRef<str>>(&self, query: &str, tags: &[S]) -> Result<Option<Value>> {
        self.search_with_type(query, tags, None).await
    }

    /// Search packages, optionally restricted to a package type.
    ///
    /// # Errors
    /// Returns error if the request fails or the body is not JSON.
    pub async fn search_with_type<S: AsRef<str>>(
        &self,
        query: &str,
        tags: &[S],
        package_type: Option<&str>,
    ) -> Result<Option<Value>> {
        let params = EndpointParams::default()
            .with_query(query)
            .with_type(package_type);
        self.request_value(
            Endpoint::Search.as_str(),
            &params,
            search_options(tags),
        )
        .await
    }

    /// Search and decode the result list.
    ///
    /// # Errors
    /// Returns error if the request fails or the body does not decode.
    pub async fn search_results<S: AsRef<str>>(
        &self,
        query: &str,
        tags: &[S],
        package_type: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        let params = EndpointParams::default()
            .with_query(query)
            .with_type(package_type);
        let response: Option<SearchResponse> = self
            .request_typed(Endpoint::Search.as_str(), &params, search_options(tags))
            .await?;
        Ok(response.map(|r| r.results).unwrap_or_default())
    }

    /// List every package name known to the registry.
    ///
    /// # Errors
    /// Returns error if the request fails or the body does not decode.
    pub async fn list_package_names(&self) -> Result<Vec<String>> {
        let response: Option<PackageListResponse> = self
            .request_typed(
                Endpoint::Packages.as_str(),
                &EndpointParams::default(),
                RequestOptions::for_endpoint(Endpoint::Packages),
            )
            .await?;
        Ok(response.map(PackageListResponse::into_names).unwrap_or_default())
    }

    /// Report one install of `name`.
    ///
    /// # Errors
    /// Returns error if the request fails or the body is not JSON.
    pub async fn notify(&self, name: &str) -> Result<Option<Value>> {
        self.request_value(
            Endpoint::Notify.as_str(),
            &EndpointParams::package(name),
            RequestOptions::for_endpoint(Endpoint::Notify),
        )
        .await
    }

    /// Report installs of every package in `packages` in one request.
    ///
    /// # Errors
    /// Returns [`ClientError::EmptyBatch`] for an empty slice, otherwise
    /// error if the request fails or the body is not JSON.
    pub async fn notify_batch(&self, packages: &[PackageDescriptor]) -> Result<Option<Value>> {
        if packages.is_empty() {
            return Err(ClientError::EmptyBatch);
        }

        let body = to_json(&NotifyBatchRequest {
            downloads: packages,
        })?;
        debug!(count = packages.len(), "sending batch notification");

        self.request_value(
            Endpoint::NotifyBatch.as_str(),
            &EndpointParams::default(),
            RequestOptions::for_endpoint(Endpoint::NotifyBatch).with_json_body(body),
        )
        .await
    }

    /// Fetch the registry root and adopt the endpoints it advertises.
    ///
    /// Returns `Ok(None)` when the registry answers with an empty document;
    /// an unreachable registry is an error.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] if the registry cannot be reached.
    pub async fn ping(&self) -> Result<Option<Value>> {
        let data = self
            .request_value(
                Endpoint::Ping.as_str(),
                &EndpointParams::default(),
                RequestOptions::for_endpoint(Endpoint::Ping),
            )
            .await
            .inspect_err(|e| warn!(error = %e, "ping failed"))?;

        let Some(data) = data else {
            debug!("registry returned no endpoint data");
            return Ok(None);
        };

        let updated = self.templates.write().overlay(&data);
        if !updated.is_empty() {
            info!(endpoints = ?updated, "adopted endpoints advertised by registry");
        }

        Ok(Some(data))
    }

    /// Issue one request and decode the body as generic JSON.
    ///
    /// # Errors
    /// Returns error if the request fails or the body is not JSON.
    pub async fn request_value(
        &self,
        name: &str,
        params: &EndpointParams<'_>,
        options: RequestOptions,
    ) -> Result<Option<Value>> {
        let (url, body) = self.api_request(name, params, options).await?;
        let Some(body) = body else {
            return Ok(None);
        };
        let value: Value = decode(&url, &body)?;
        Ok((!is_empty_value(&value)).then_some(value))
    }

    async fn request_typed<T: DeserializeOwned>(
        &self,
        name: &str,
        params: &EndpointParams<'_>,
        options: RequestOptions,
    ) -> Result<Option<T>> {
        let (url, body) = self.api_request(name, params, options).await?;
        let Some(body) = body else {
            return Ok(None);
        };
        let value: Value = decode(&url, &body)?;
        if is_empty_value(&value) {
            return Ok(None);
        }
        decode(&url, &body).map(Some)
    }

    /// Shape and send a request. Returns the URL used and the body, `None`
    /// when the body is blank.
    ///
    /// # Errors
    /// Returns error on local validation failure, transport failure or a
    /// non-success status.
    pub async fn api_request(
        &self,
        name: &str,
        params: &EndpointParams<'_>,
        options: RequestOptions,
    ) -> Result<(Url, Option<Bytes>)> {
        let mut url = self.endpoint_url(name, params)?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&options.query);
        }

        let headers = self.merge_headers(&options.headers);

        debug!(endpoint = name, method = %options.method, url = %url, "api request");

        let response = self
            .transport
            .send(TransportRequest {
                method: options.method,
                url: url.clone(),
                headers,
                body: options.body,
            })
            .await?;

        if !response.status.is_success() {
            let reason = response
                .status
                .canonical_reason()
                .unwrap_or("unexpected status");
            let detail = String::from_utf8_lossy(&response.body);
            let detail = detail.trim();
            let message = if detail.is_empty() || detail.len() > 200 {
                reason.to_string()
            } else {
                format!("{reason}: {detail}")
            };
            return Err(ClientError::status(
                url.as_str(),
                response.status.as_u16(),
                message,
            ));
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            debug!(url = %url, "empty response body");
            return Ok((url, None));
        }

        Ok((url, Some(response.body)))
    }

    fn merge_headers(&self, overrides: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        match HeaderValue::from_str(&self.config.user_agent) {
            Ok(ua) => {
                headers.insert(USER_AGENT, ua);
            }
            Err(_) => warn!(user_agent = %self.config.user_agent, "ignoring invalid user agent"),
        }
        for layer in [&self.config.headers, overrides] {
            for (name, value) in layer {
                headers.insert(name.clone(), value.clone());
            }
        }
        headers
    }
}

fn search_options<S: AsRef<str>>(tags: &[S]) -> RequestOptions {
    let options = RequestOptions::for_endpoint(Endpoint::Search);
    match tags {
        [] => options,
        [tag] => options.with_query("tags", tag.as_ref()),
        _ => tags
            .iter()
            .fold(options, |o, tag| o.with_query("tags[]", tag.as_ref())),
    }
}

fn decode<T: DeserializeOwned>(url: &Url, body: &[u8]) -> Result<T> {
    from_json_slice(body).map_err(|e| ClientError::Parse {
        url: url.to_string(),
        message: e.to_string(),
    })
}
