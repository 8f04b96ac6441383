//! Core types shared by the pkgist crates.
//!
//! Holds the package identifiers and notification descriptors that travel
//! over the Packagist API, plus thin JSON helpers over sonic-rs.

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod json;
pub mod package;

pub use error::{Error, Result};
pub use json::{from_json, from_json_slice, is_empty_value, to_json, to_json_pretty};
pub use package::{PackageDescriptor, PackageName, WILDCARD_VERSION};
