//! JSON operations using sonic-rs.

use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use sonic_rs::{JsonContainerTrait, JsonValueTrait, Value};

/// Deserialize JSON string.
///
/// # Errors
/// Returns error if JSON is invalid.
pub fn from_json<T: DeserializeOwned>(s: &str) -> Result<T> {
    sonic_rs::from_str(s).map_err(Error::from)
}

/// Deserialize JSON bytes.
///
/// # Errors
/// Returns error if JSON is invalid.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    sonic_rs::from_slice(bytes).map_err(Error::from)
}

/// Serialize to compact JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    sonic_rs::to_string(value).map_err(Error::from)
}

/// Serialize to pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    sonic_rs::to_string_pretty(value).map_err(Error::from)
}

/// Whether a decoded response carries no data.
///
/// `null`, `false`, the empty string, `{}` and `[]` count as empty.
/// Numbers never do.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    if value.is_null() {
        return true;
    }
    if let Some(b) = value.as_bool() {
        return !b;
    }
    if let Some(s) = value.as_str() {
        return s.is_empty();
    }
    if let Some(obj) = value.as_object() {
        return obj.is_empty();
    }
    if let Some(arr) = value.as_array() {
        return arr.is_empty();
    }
    false
}
