//! Error handling module for the Jiskefet client.
//!
//! Every failed request, whatever its cause, is normalized into one [`HttpError`]
//! shape carrying a status code and a message.

use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const HTTP_STATUS: &str = "HTTP_STATUS";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const MISSING_RUN_NUMBER: &str = "MISSING_RUN_NUMBER";
    pub const MISSING_TITLE: &str = "MISSING_TITLE";
    pub const NO_DRAFT: &str = "NO_DRAFT";
    pub const NOT_AUTHENTICATED: &str = "NOT_AUTHENTICATED";
}

/// Status reported for failures that never produced an HTTP response.
pub const NO_STATUS: u16 = 0;

/// What went wrong while talking to the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HttpErrorKind {
    /// Connection refused, timeout, TLS failure and the like
    Transport,
    /// The server answered with a non-success status
    Status,
    /// The response (or request) body was not the expected JSON
    Decode,
}

/// Normalized request failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    pub kind: HttpErrorKind,
    /// HTTP status, or [`NO_STATUS`] when no response was received
    pub status: u16,
    pub message: String,
}

impl HttpError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: HttpErrorKind::Transport,
            status: NO_STATUS,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: HttpErrorKind::Status,
            status,
            message: message.into(),
        }
    }

    pub fn decode(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: HttpErrorKind::Decode,
            status,
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            HttpErrorKind::Transport => codes::TRANSPORT_ERROR,
            HttpErrorKind::Status => codes::HTTP_STATUS,
            HttpErrorKind::Decode => codes::DECODE_ERROR,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == HttpErrorKind::Status && self.status == 401
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.status == NO_STATUS {
            write!(f, "{}: {}", self.error_code(), self.message)
        } else {
            write!(f, "{} {}: {}", self.error_code(), self.status, self.message)
        }
    }
}

impl std::error::Error for HttpError {}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Request error: {:?}", err);
        match err.status() {
            Some(status) => HttpError::status(status.as_u16(), err.to_string()),
            None if err.is_decode() => HttpError::decode(NO_STATUS, err.to_string()),
            None => HttpError::transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        HttpError::decode(NO_STATUS, format!("JSON error: {}", err))
    }
}

/// Failure reading or writing persisted client storage.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "{}: {}", codes::STORAGE_ERROR, err),
            StorageError::Json(err) => write!(f, "{}: {}", codes::STORAGE_ERROR, err),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Storage I/O error: {:?}", err);
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Storage JSON error: {:?}", err);
        StorageError::Json(err)
    }
}

/// Why a log draft could not be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// No draft is being edited
    NoDraft,
    /// Title is blank
    MissingTitle,
    /// A run log needs a run number before it can be posted
    MissingRunNumber,
    /// No profile is loaded, so the author is unknown
    NotAuthenticated,
    /// The request itself failed (already recorded in the error log)
    Http(HttpError),
}

impl SubmitError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SubmitError::NoDraft => codes::NO_DRAFT,
            SubmitError::MissingTitle => codes::MISSING_TITLE,
            SubmitError::MissingRunNumber => codes::MISSING_RUN_NUMBER,
            SubmitError::NotAuthenticated => codes::NOT_AUTHENTICATED,
            SubmitError::Http(err) => err.error_code(),
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::NoDraft => write!(f, "{}: no log draft to submit", self.error_code()),
            SubmitError::MissingTitle => write!(f, "{}: a title is required", self.error_code()),
            SubmitError::MissingRunNumber => {
                write!(f, "{}: a run log needs a run number", self.error_code())
            }
            SubmitError::NotAuthenticated => {
                write!(f, "{}: no profile loaded", self.error_code())
            }
            SubmitError::Http(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<HttpError> for SubmitError {
    fn from(err: HttpError) -> Self {
        SubmitError::Http(err)
    }
}
