//! Package identifiers and download descriptors.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Version reported when a descriptor does not name one.
pub const WILDCARD_VERSION: &str = "*";

/// Package name (vendor/name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName {
    vendor: String,
    name: String,
}

impl PackageName {
    /// Create new package name.
    #[must_use]
    pub fn new(vendor: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            name: name.into(),
        }
    }

    /// Parse from "vendor/name" string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (vendor, name) = s.trim().split_once('/')?;
        if vendor.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(vendor, name))
    }

    /// Get vendor.
    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Get name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.vendor, self.name)
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.vendor, self.name)
    }
}

impl FromStr for PackageName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidPackageName(s.to_string()))
    }
}

impl TryFrom<String> for PackageName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> Self {
        name.full_name()
    }
}

/// A package install reported to the registry's download counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Package name as registered on Packagist.
    pub name: String,
    /// Installed version, `*` when unknown.
    #[serde(default = "wildcard")]
    pub version: String,
}

fn wildcard() -> String {
    WILDCARD_VERSION.to_string()
}

impl PackageDescriptor {
    /// Create a descriptor for a specific version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Create a descriptor with the wildcard version.
    #[must_use]
    pub fn any_version(name: impl Into<String>) -> Self {
        Self::new(name, WILDCARD_VERSION)
    }

    /// Parse `vendor/name` or `vendor/name:version`.
    ///
    /// # Errors
    /// Returns error if the name part is not `vendor/name`.
    pub fn parse(s: &str) -> Result<Self> {
        let (name, version) = match s.split_once(':') {
            Some((name, version)) if !version.is_empty() => (name, version),
            Some((name, _)) => (name, WILDCARD_VERSION),
            None => (s, WILDCARD_VERSION),
        };
        let name: PackageName = name.parse()?;
        Ok(Self::new(name.full_name(), version))
    }
}
