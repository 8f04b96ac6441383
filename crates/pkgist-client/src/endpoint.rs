//! Endpoint templates and their resolution into request paths.
//!
//! Each logical operation maps to a relative path that may carry named
//! placeholders. Packagist advertises its own paths from `packages.json`
//! using `%package%`; the built-in defaults use `{{package}}`. Both forms,
//! plus single-brace `{package}`, are recognised case-insensitively.

use crate::error::{ClientError, Result};
use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::{Captures, Regex};
use reqwest::Method;
use sonic_rs::{JsonContainerTrait, JsonValueTrait, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\{\{\s*(package|hash|query|type)\s*\}\}|\{(package|hash|query|type)\}|%(package|hash|query|type)%",
    )
    .expect("placeholder pattern compiles")
});

/// Bytes escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Logical operation exposed by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    /// Registry root metadata, also advertises the other endpoints.
    Ping,
    /// Metadata for one package.
    Package,
    /// List of all package names.
    Packages,
    /// Full-text package search.
    Search,
    /// Install notification for one package.
    Notify,
    /// Install notification for several packages.
    NotifyBatch,
}

impl Endpoint {
    /// All operations, in table order.
    pub const ALL: [Self; 6] = [
        Self::Ping,
        Self::Packages,
        Self::Package,
        Self::Search,
        Self::Notify,
        Self::NotifyBatch,
    ];

    /// Operation name as used in templates and `packages.json`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Package => "package",
            Self::Packages => "packages",
            Self::Search => "search",
            Self::Notify => "notify",
            Self::NotifyBatch => "notify-batch",
        }
    }

    /// Built-in path template.
    #[must_use]
    pub const fn default_template(self) -> &'static str {
        match self {
            Self::Ping => "/packages.json",
            Self::Package => "/p/{{package}}.json",
            Self::Packages => "/packages/list.json",
            Self::Search => "/search.json",
            Self::Notify => "/downloads/{{package}}",
            Self::NotifyBatch => "/downloads/",
        }
    }

    /// HTTP method the operation is issued with.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Notify | Self::NotifyBatch => Method::POST,
            _ => Method::GET,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Endpoint {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ClientError::UnknownEndpoint {
                name: s.to_string(),
            })
    }
}

/// Named placeholder inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Package name (`vendor/name`).
    Package,
    /// Content hash.
    Hash,
    /// Search query.
    Query,
    /// Package type filter.
    Type,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "package" => Some(Self::Package),
            "hash" => Some(Self::Hash),
            "query" => Some(Self::Query),
            "type" => Some(Self::Type),
            _ => None,
        }
    }

    /// Placeholder name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Hash => "hash",
            Self::Query => "query",
            Self::Type => "type",
        }
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointParams<'a> {
    /// Package name.
    pub package: Option<&'a str>,
    /// Content hash.
    pub hash: Option<&'a str>,
    /// Search query.
    pub query: Option<&'a str>,
    /// Package type filter.
    pub package_type: Option<&'a str>,
}

impl<'a> EndpointParams<'a> {
    /// Params naming a package.
    #[must_use]
    pub const fn package(name: &'a str) -> Self {
        Self {
            package: Some(name),
            hash: None,
            query: None,
            package_type: None,
        }
    }

    /// Add a hash.
    #[must_use]
    pub const fn with_hash(mut self, hash: &'a str) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Add a search query.
    #[must_use]
    pub const fn with_query(mut self, query: &'a str) -> Self {
        self.query = Some(query);
        self
    }

    /// Add a package type filter.
    #[must_use]
    pub const fn with_type(mut self, package_type: Option<&'a str>) -> Self {
        self.package_type = package_type;
        self
    }

    const fn get(&self, placeholder: Placeholder) -> Option<&'a str> {
        match placeholder {
            Placeholder::Package => self.package,
            Placeholder::Hash => self.hash,
            Placeholder::Query => self.query,
            Placeholder::Type => self.package_type,
        }
    }
}

/// A template with its placeholders filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Relative path (or absolute URL) ready to join onto the base URL.
    pub path: String,
    /// Placeholders that appeared in the template.
    pub consumed: Vec<Placeholder>,
}

impl ResolvedPath {
    /// Whether the template carried `placeholder`.
    #[must_use]
    pub fn consumed(&self, placeholder: Placeholder) -> bool {
        self.consumed.contains(&placeholder)
    }
}

/// Mapping from operation name to path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplates {
    templates: BTreeMap<String, String>,
}

impl Default for EndpointTemplates {
    fn default() -> Self {
        let templates = Endpoint::ALL
            .into_iter()
            .map(|e| (e.as_str().to_string(), e.default_template().to_string()))
            .collect();
        Self { templates }
    }
}

impl EndpointTemplates {
    /// Template registered for `name`.
    ///
    /// # Errors
    /// Returns [`ClientError::UnknownEndpoint`] if there is none.
    pub fn get(&self, name: &str) -> Result<&str> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ClientError::UnknownEndpoint {
                name: name.to_string(),
            })
    }

    /// Iterate over `(name, template)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace the template of a known operation.
    ///
    /// # Errors
    /// Returns [`ClientError::UnknownEndpoint`] if `name` is not registered.
    pub fn set(&mut self, name: &str, template: impl Into<String>) -> Result<()> {
        match self.templates.get_mut(name) {
            Some(slot) => {
                *slot = template.into();
                Ok(())
            }
            None => Err(ClientError::UnknownEndpoint {
                name: name.to_string(),
            }),
        }
    }

    /// Overlay string values of a `packages.json` document onto known
    /// operations. Returns the names that changed.
    pub fn overlay(&mut self, document: &Value) -> Vec<String> {
        let Some(object) = document.as_object() else {
            return Vec::new();
        };

        let mut updated = Vec::new();
        for (key, value) in object.iter() {
            let Some(template) = value.as_str() else {
                continue;
            };
            if let Some(slot) = self.templates.get_mut(key) {
                if slot.as_str() != template {
                    *slot = template.to_string();
                    updated.push(key.to_string());
                }
            }
        }
        updated
    }

    /// Resolve `name` into a path, substituting every placeholder.
    ///
    /// Values landing in the query string are form-encoded. Values landing
    /// in the path are percent-encoded per segment; package names and hashes
    /// keep their `/` separators, query and type values do not.
    ///
    /// # Errors
    /// Returns [`ClientError::UnknownEndpoint`] for an unregistered name,
    /// [`ClientError::MissingParameter`] when a required value is absent and
    /// [`ClientError::InvalidParameter`] when a path value holds a `.` or
    /// `..` segment.
    pub fn resolve(&self, name: &str, params: &EndpointParams<'_>) -> Result<ResolvedPath> {
        let template = self.get(name)?;
        let query_start = template.find('?').unwrap_or(template.len());

        let mut path = String::with_capacity(template.len());
        let mut consumed = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let Some(placeholder) = placeholder_of(&caps) else {
                continue;
            };

            let value = match params.get(placeholder) {
                Some(value) => value,
                None if placeholder == Placeholder::Type => "",
                None => {
                    return Err(ClientError::MissingParameter {
                        endpoint: name.to_string(),
                        placeholder: placeholder.as_str().to_string(),
                    });
                }
            };

            let encoded: String = if whole.start() >= query_start {
                url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
            } else {
                let keep_slashes = matches!(placeholder, Placeholder::Package | Placeholder::Hash);
                encode_path_value(value, keep_slashes).ok_or_else(|| {
                    ClientError::InvalidParameter {
                        endpoint: name.to_string(),
                        placeholder: placeholder.as_str().to_string(),
                        value: value.to_string(),
                    }
                })?
            };

            path.push_str(&template[last..whole.start()]);
            path.push_str(&encoded);
            last = whole.end();

            if !consumed.contains(&placeholder) {
                consumed.push(placeholder);
            }
        }
        path.push_str(&template[last..]);

        Ok(ResolvedPath { path, consumed })
    }
}

/// Encode a value for the path. `None` if a segment would be read as a
/// relative reference.
fn encode_path_value(value: &str, keep_slashes: bool) -> Option<String> {
    if !keep_slashes {
        if matches!(value, "." | "..") {
            return None;
        }
        return Some(utf8_percent_encode(value, PATH_SEGMENT).to_string());
    }

    let mut encoded = Vec::new();
    for segment in value.split('/') {
        if matches!(segment, "." | "..") {
            return None;
        }
        encoded.push(utf8_percent_encode(segment, PATH_SEGMENT).to_string());
    }
    Some(encoded.join("/"))
}

fn placeholder_of(caps: &Captures<'_>) -> Option<Placeholder> {
    (1..=3)
        .find_map(|i| caps.get(i))
        .and_then(|m| Placeholder::from_name(m.as_str()))
}

/// Join a resolved path onto the base URL with exactly one `/` between.
///
/// Absolute `http(s)` paths replace the base entirely.
///
/// # Errors
/// Returns [`ClientError::InvalidUrl`] if the result does not parse.
pub fn join_url(base: &Url, path: &str) -> Result<Url> {
    let lower = path.to_ascii_lowercase();
    let joined = if lower.starts_with("http://") || lower.starts_with("https://") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };

    Url::parse(&joined).map_err(|e| ClientError::InvalidUrl {
        url: joined.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://packagist.org").unwrap()
    }

    #[test]
    fn endpoint_names_roundtrip() {
        for endpoint in Endpoint::ALL {
            assert_eq!(endpoint.as_str().parse::<Endpoint>().unwrap(), endpoint);
        }
        assert!(matches!(
            "downloads".parse::<Endpoint>(),
            Err(ClientError::UnknownEndpoint { .. })
        ));
    }

    #[test]
    fn default_methods() {
        assert_eq!(Endpoint::Notify.method(), Method::POST);
        assert_eq!(Endpoint::NotifyBatch.method(), Method::POST);
        assert_eq!(Endpoint::Search.method(), Method::GET);
    }

    #[test]
    fn plain_templates_resolve_to_literal_paths() {
        let templates = EndpointTemplates::default();
        for endpoint in [
            Endpoint::Ping,
            Endpoint::Packages,
            Endpoint::Search,
            Endpoint::NotifyBatch,
        ] {
            let resolved = templates
                .resolve(endpoint.as_str(), &EndpointParams::default())
                .unwrap();
            assert_eq!(resolved.path, endpoint.default_template());
            let url = join_url(&base(), &resolved.path).unwrap();
            assert_eq!(
                url.as_str(),
                format!("https://packagist.org{}", endpoint.default_template())
            );
        }
    }

    #[test]
    fn package_placeholder() {
        let templates = EndpointTemplates::default();
        let resolved = templates
            .resolve("package", &EndpointParams::package("vendor/pkg"))
            .unwrap();
        assert_eq!(resolved.path, "/p/vendor/pkg.json");
        assert!(resolved.consumed(Placeholder::Package));
        assert_eq!(
            join_url(&base(), &resolved.path).unwrap().as_str(),
            "https://packagist.org/p/vendor/pkg.json"
        );
    }

    #[test]
    fn every_syntax_and_occurrence_is_replaced() {
        let mut templates = EndpointTemplates::default();
        templates
            .set("package", "/p/{{PACKAGE}}/%package%/{Package}${{hash}}.json")
            .unwrap();
        let resolved = templates
            .resolve("package", &EndpointParams::package("a/b").with_hash("f00"))
            .unwrap();
        assert_eq!(resolved.path, "/p/a/b/a/b/a/b$f00.json");
        assert!(resolved.consumed(Placeholder::Hash));
    }

    #[test]
    fn missing_value_is_local_error() {
        let templates = EndpointTemplates::default();
        let err = templates
            .resolve("notify", &EndpointParams::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::MissingParameter { ref placeholder, .. } if placeholder == "package"
        ));
    }

    #[test]
    fn query_and_type_are_encoded() {
        let mut templates = EndpointTemplates::default();
        templates
            .set("search", "/search.json?q=%query%&type=%type%")
            .unwrap();

        let params = EndpointParams::default().with_query("log & trace");
        let resolved = templates.resolve("search", &params).unwrap();
        assert_eq!(resolved.path, "/search.json?q=log+%26+trace&type=");

        let params = params.with_type(Some("library"));
        let resolved = templates.resolve("search", &params).unwrap();
        assert_eq!(resolved.path, "/search.json?q=log+%26+trace&type=library");
    }

    #[test]
    fn path_values_are_percent_encoded() {
        let templates = EndpointTemplates::default();
        let resolved = templates
            .resolve("package", &EndpointParams::package("a/b#x"))
            .unwrap();
        assert_eq!(resolved.path, "/p/a/b%23x.json");

        let url = join_url(&base(), &resolved.path).unwrap();
        assert_eq!(url.path(), "/p/a/b%23x.json");
        assert!(url.fragment().is_none());

        let resolved = templates
            .resolve("notify", &EndpointParams::package("a/b?c d"))
            .unwrap();
        assert_eq!(resolved.path, "/downloads/a/b%3Fc%20d");
    }

    #[test]
    fn dot_segments_are_rejected() {
        let templates = EndpointTemplates::default();
        for name in ["../packages", "a/..", "./b", ".."] {
            let err = templates
                .resolve("package", &EndpointParams::package(name))
                .unwrap_err();
            assert!(
                matches!(err, ClientError::InvalidParameter { ref placeholder, ref value, .. }
                    if placeholder == "package" && value == name),
                "{name} should be rejected"
            );
            assert!(err.is_local());
        }
        assert!(templates
            .resolve("package", &EndpointParams::package("a/b..c"))
            .is_ok());
    }

    #[test]
    fn query_in_path_uses_path_encoding() {
        let mut templates = EndpointTemplates::default();
        templates
            .set("search", "/search/{{query}}/{type}.json?q=%query%")
            .unwrap();

        let params = EndpointParams::default()
            .with_query("log trace/x")
            .with_type(Some("library"));
        let resolved = templates.resolve("search", &params).unwrap();
        assert_eq!(
            resolved.path,
            "/search/log%20trace%2Fx/library.json?q=log+trace%2Fx"
        );

        let params = EndpointParams::default().with_query("..");
        assert!(matches!(
            templates.resolve("search", &params),
            Err(ClientError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn unknown_name() {
        let templates = EndpointTemplates::default();
        assert!(matches!(
            templates.resolve("mirrors", &EndpointParams::default()),
            Err(ClientError::UnknownEndpoint { ref name }) if name == "mirrors"
        ));
        let mut templates = templates;
        assert!(templates.set("mirrors", "/m").is_err());
    }

    #[test]
    fn overlay_only_touches_known_string_keys() {
        let mut templates = EndpointTemplates::default();
        let doc: Value = sonic_rs::from_str(
            r#"{
                "packages": [],
                "notify": "/downloads/%package%",
                "notify-batch": "/downloads/",
                "metadata-url": "/p2/%package%.json",
                "search": "/search.json?q=%query%&type=%type%",
                "package": 42
            }"#,
        )
        .unwrap();

        let mut updated = templates.overlay(&doc);
        updated.sort();
        assert_eq!(updated, vec!["notify", "search"]);
        assert_eq!(templates.get("notify").unwrap(), "/downloads/%package%");
        assert_eq!(templates.get("package").unwrap(), "/p/{{package}}.json");
        assert!(templates.get("metadata-url").is_err());
    }

    #[test]
    fn overlay_ignores_non_objects() {
        let mut templates = EndpointTemplates::default();
        let doc: Value = sonic_rs::from_str("[1, 2]").unwrap();
        assert!(templates.overlay(&doc).is_empty());
        assert_eq!(templates, EndpointTemplates::default());
    }

    #[test]
    fn join_normalises_slashes() {
        let base = Url::parse("https://repo.example.com/acme/").unwrap();
        assert_eq!(
            join_url(&base, "/packages.json").unwrap().as_str(),
            "https://repo.example.com/acme/packages.json"
        );
        assert_eq!(
            join_url(&base, "packages.json").unwrap().as_str(),
            "https://repo.example.com/acme/packages.json"
        );
        assert_eq!(
            join_url(&base, "https://mirror.example.org/p/a/b.json")
                .unwrap()
                .as_str(),
            "https://mirror.example.org/p/a/b.json"
        );
    }
}
