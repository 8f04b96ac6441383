//! Packagist API response and request types.

use pkgist_core::PackageDescriptor;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `search.json`. Only the first page is read.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Matching packages.
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One search hit as the CLI lists it.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Package name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Install count reported by the registry.
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub abandoned: AbandonedValue,
}

/// `abandoned` is either a flag or the name of the suggested replacement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum AbandonedValue {
    /// Boolean abandoned flag.
    Boolean(bool),
    /// Replacement package name.
    Replacement(String),
    /// Not abandoned.
    #[default]
    None,
}

impl AbandonedValue {
    /// Whether the package is marked abandoned.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Replacement(_) => true,
            Self::None => false,
        }
    }

    /// Suggested replacement, when one is named.
    #[must_use]
    pub fn replacement(&self) -> Option<&str> {
        match self {
            Self::Replacement(s) => Some(s),
            _ => None,
        }
    }
}

/// Body of `packages/list.json`.
///
/// Plain listings carry `packageNames`; listings requested with extra
/// fields key their entries by name under `packages`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PackageListResponse {
    /// `{"packageNames": [...]}`
    Names {
        #[serde(rename = "packageNames")]
        package_names: Vec<String>,
    },
    /// `{"packages": {"vendor/name": {...}}}`
    Keyed {
        #[serde(default)]
        packages: HashMap<String, IgnoredAny>,
    },
}

impl PackageListResponse {
    /// Package names, sorted.
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        let mut names = match self {
            Self::Names { package_names } => package_names,
            Self::Keyed { packages } => packages.into_keys().collect(),
        };
        names.sort_unstable();
        names
    }
}

/// Body of a batch install notification.
#[derive(Debug, Clone, Serialize)]
pub struct NotifyBatchRequest<'a> {
    /// Every package being reported.
    pub downloads: &'a [PackageDescriptor],
}
