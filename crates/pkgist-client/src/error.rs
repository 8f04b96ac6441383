//! Client error types.

use pkgist_core::Error as CoreError;
use thiserror::Error;

/// Errors raised by the Packagist client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Logical operation has no endpoint template.
    #[error("the endpoint type of '{name}' is invalid")]
    UnknownEndpoint {
        /// Requested operation name.
        name: String,
    },

    /// Endpoint template needs a value the caller did not supply.
    #[error("endpoint '{endpoint}' requires a value for '{placeholder}'")]
    MissingParameter {
        /// Operation name.
        endpoint: String,
        /// Placeholder name.
        placeholder: String,
    },

    /// Supplied value cannot be placed in the request path.
    #[error("endpoint '{endpoint}' cannot use '{value}' for '{placeholder}'")]
    InvalidParameter {
        /// Operation name.
        endpoint: String,
        /// Placeholder name.
        placeholder: String,
        /// Rejected value.
        value: String,
    },

    /// Batch notification with nothing to report.
    #[error("notify-batch requires at least one package")]
    EmptyBatch,

    /// Base URL or resolved URL is malformed.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The invalid URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Service unreachable or answered with a non-success status.
    #[error("{}", transport_message(url, message, *status))]
    Transport {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
        /// HTTP status code if a response was received.
        status: Option<u16>,
    },

    /// Response body is not valid JSON.
    #[error("failed to parse response from {url}: {message}")]
    Parse {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Invalid client configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// Core error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

fn transport_message(url: &str, message: &str, status: Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {code} from {url}: {message}"),
        None => format!("cannot connect to {url}: {message}"),
    }
}

impl ClientError {
    /// Create a transport error without a status code.
    #[must_use]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a transport error for a non-success response.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
            status: Some(status),
        }
    }

    /// Whether the error was raised before any network activity.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::UnknownEndpoint { .. }
                | Self::MissingParameter { .. }
                | Self::InvalidParameter { .. }
                | Self::EmptyBatch
                | Self::InvalidUrl { .. }
                | Self::Config(_)
        )
    }

    /// HTTP status of the failed response, if any.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map_or_else(|| "<unknown>".to_string(), ToString::to_string);
        let status = err.status().map(|s| s.as_u16());
        Self::Transport {
            url,
            message: err.to_string(),
            status,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
