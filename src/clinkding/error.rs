//! Error taxonomy shared by every layer.
//!
//! Each variant maps to exactly one process exit code (see [`Error::exit_code`]).
//! HTTP status classification lives in [`classify`], a pure function so it can be
//! exercised without a server.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Check your API token.";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";

#[derive(Error, Debug)]
pub enum Error {
    #[error("request failed: {0}")]
    Network(String),

    #[error("{}", AUTH_FAILED_MESSAGE)]
    Authentication { status: u16 },

    #[error("{0}")]
    NotFound(String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("{}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Config(String),

    #[error("invalid config file: {0}")]
    ConfigFile(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Authentication { .. } => 3,
            Error::NotFound(_) => 4,
            _ => 1,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

fn detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.is_empty())
}

/// Maps an HTTP status and raw body to an error. Returns `None` for 2xx.
pub fn classify(status: u16, body: &[u8]) -> Option<Error> {
    match status {
        200..=299 => None,
        401 | 403 => Some(Error::Authentication { status }),
        404 => Some(Error::NotFound(
            detail(body).unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
        )),
        _ => {
            let message = detail(body)
                .or_else(|| {
                    let raw = String::from_utf8_lossy(body).trim().to_string();
                    (!raw.is_empty()).then_some(raw)
                })
                .unwrap_or_else(|| format!("API request failed with status {}", status));
            Some(Error::Request { status, message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_are_not_errors() {
        assert!(classify(200, b"{}").is_none());
        assert!(classify(201, b"").is_none());
        assert!(classify(204, b"").is_none());
    }

    #[test]
    fn not_found_uses_server_detail() {
        let err = classify(404, br#"{"detail":"Bookmark not found"}"#).unwrap();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.to_string(), "Bookmark not found");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn not_found_without_detail_uses_generic_message() {
        let err = classify(404, b"<html>nope</html>").unwrap();
        assert_eq!(err.to_string(), NOT_FOUND_MESSAGE);

        let err = classify(404, br#"{"detail":""}"#).unwrap();
        assert_eq!(err.to_string(), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn auth_failures_ignore_body() {
        for status in [401, 403] {
            let err = classify(status, br#"{"detail":"Invalid token."}"#).unwrap();
            assert_eq!(err.to_string(), AUTH_FAILED_MESSAGE);
            assert_eq!(err.exit_code(), 3);
        }
    }

    #[test]
    fn other_failures_prefer_detail_then_body() {
        let err = classify(400, br#"{"detail":"url is required"}"#).unwrap();
        assert_eq!(err.to_string(), "url is required");
        assert_eq!(err.exit_code(), 1);

        let err = classify(500, b"  Internal Server Error\n").unwrap();
        assert_eq!(err.to_string(), "Internal Server Error");

        let err = classify(502, b"").unwrap();
        assert_eq!(err.to_string(), "API request failed with status 502");
    }

    #[test]
    fn validation_body_without_detail_is_passed_through() {
        let body = br#"{"url":["This field is required."]}"#;
        let err = classify(400, body).unwrap();
        assert!(matches!(err, Error::Request { status: 400, .. }));
        assert_eq!(err.to_string(), String::from_utf8_lossy(body));
    }
}
