//! Publish error types

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Process exit codes carried by [`PublishError`]
pub mod exit_code {
    /// Package or source file could not be opened or read
    pub const PACKAGE_FILE: i32 = 1;

    /// The remote validator rejected the package
    pub const VALIDATION_FAILED: i32 = 2;

    /// The remote validator did not finish in time
    pub const VALIDATION_TIMEOUT: i32 = 4;

    /// Malformed or missing caller input
    pub const INVALID_INPUT: i32 = 5;

    /// manifest.json unreadable or without a usable version
    pub const MANIFEST_VERSION: i32 = 6;

    /// Error response, unusable response or transport failure talking to the API
    pub const UPSTREAM_HTTP: i32 = 254;

    /// Anything else
    pub const UNKNOWN: i32 = 255;
}

/// Upper bound for remote payloads embedded in error messages
const MAX_DETAIL_CHARS: usize = 4000;

/// Why the version could not be read out of the package manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Archive or manifest.json entry could not be read
    #[error("failed to read manifest.json from {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// manifest.json is not a JSON object
    #[error("failed to parse manifest.json. Is it a valid JSON file? ({0})")]
    Malformed(String),

    /// `version` is missing, empty or not a string
    #[error("manifest.json does not have a valid version field")]
    MissingVersion,
}

/// Errors raised while publishing an add-on
#[derive(Debug, Error)]
pub enum PublishError {
    /// Package or source file could not be opened
    #[error("Cannot read {path}: {source}")]
    PackageFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Package processed by the validator, but not valid
    #[error("xpi processed, but not valid:\n{}", render_detail(.detail))]
    ValidationFailed { detail: serde_json::Value },

    /// Validator did not finish before the polling deadline
    #[error("Timeout waiting for xpi validation after {waited:?}")]
    ValidationTimeout { waited: Duration },

    /// Invalid caller input or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Version number could not be read from the package
    #[error("Error getting addon version: {0}")]
    ManifestVersion(#[from] ManifestError),

    /// The API answered with an error status
    #[error("Firefox API server responded with error code {status}: {}", truncate_detail(.body))]
    HttpStatus { status: u16, body: String },

    /// The API answered with a success status but a body that cannot be decoded
    #[error("Firefox API server sent an unexpected response (status {status}): {}", truncate_detail(.body))]
    UnexpectedResponse { status: u16, body: String },

    /// No response was received
    #[error("HTTP request failed: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// JWT signing failed
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl PublishError {
    /// Exit code the CLI terminates with for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PublishError::PackageFile { .. } => exit_code::PACKAGE_FILE,
            PublishError::ValidationFailed { .. } => exit_code::VALIDATION_FAILED,
            PublishError::ValidationTimeout { .. } => exit_code::VALIDATION_TIMEOUT,
            PublishError::InvalidInput(_) => exit_code::INVALID_INPUT,
            PublishError::ManifestVersion(_) => exit_code::MANIFEST_VERSION,
            PublishError::HttpStatus { .. }
            | PublishError::UnexpectedResponse { .. }
            | PublishError::HttpTransport(_) => exit_code::UPSTREAM_HTTP,
            PublishError::Jwt(_) | PublishError::Json(_) | PublishError::Other(_) => {
                exit_code::UNKNOWN
            }
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        PublishError::InvalidInput(message.into())
    }
}

/// Cut a diagnostic payload down so it does not flood CI logs
pub fn truncate_detail(detail: &str) -> String {
    if detail.chars().count() <= MAX_DETAIL_CHARS {
        return detail.to_string();
    }
    let head: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
    format!("{}... (truncated)", head)
}

fn render_detail(detail: &serde_json::Value) -> String {
    truncate_detail(&detail.to_string())
}

/// Result type for publish operations
pub type Result<T> = std::result::Result<T, PublishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = vec![
            PublishError::PackageFile {
                path: PathBuf::from("a.xpi"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
            PublishError::ValidationFailed {
                detail: serde_json::json!({}),
            },
            PublishError::ValidationTimeout {
                waited: Duration::from_secs(600),
            },
            PublishError::InvalidInput("bad".to_string()),
            PublishError::ManifestVersion(ManifestError::MissingVersion),
            PublishError::HttpStatus {
                status: 500,
                body: String::new(),
            },
            PublishError::Other("boom".to_string()),
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes, vec![1, 2, 4, 5, 6, 254, 255]);
    }

    #[test]
    fn test_validation_failed_message_includes_payload() {
        let err = PublishError::ValidationFailed {
            detail: serde_json::json!({"errors": 1, "messages": ["bad manifest"]}),
        };
        let message = err.to_string();
        assert!(message.contains("bad manifest"));
        assert!(message.contains("\"errors\":1"));
    }

    #[test]
    fn test_http_status_message_is_bounded() {
        let err = PublishError::HttpStatus {
            status: 502,
            body: "x".repeat(10_000),
        };
        let message = err.to_string();
        assert!(message.contains("502"));
        assert!(message.ends_with("(truncated)"));
        assert!(message.len() < 4200);
    }

    #[test]
    fn test_unexpected_response_is_not_a_transport_failure() {
        let err = PublishError::UnexpectedResponse {
            status: 200,
            body: "<html>maintenance</html>".to_string(),
        };
        let message = err.to_string();
        assert_eq!(err.exit_code(), exit_code::UPSTREAM_HTTP);
        assert!(message.contains("unexpected response (status 200)"));
        assert!(message.contains("maintenance"));
        assert!(!message.contains("HTTP request failed"));
    }

    #[test]
    fn test_truncate_detail_keeps_short_text() {
        assert_eq!(truncate_detail("short"), "short");
    }
}
