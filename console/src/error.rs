//! Error handling for the Beverage Distribution Console
//!
//! Every failure reaches the view as a code plus a human-readable message.
//! None of them is fatal: the user can always retry or abandon.

use serde::Serialize;
use shared::{EditorError, ValidationError, WorkflowError};
use thiserror::Error;

/// Shown when the server gives no usable message
pub const GENERIC_FAILURE: &str = "The operation could not be completed. Please try again.";

/// Console error types
#[derive(Error, Debug)]
pub enum ConsoleError {
    // Local errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Editor(#[from] EditorError),

    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    #[error("Invoice number {0} is already registered")]
    DuplicateInvoice(String),

    // Remote errors
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server error: {message}")]
    Server {
        status: Option<u16>,
        message: String,
    },

    #[error("Session expired or invalid")]
    Unauthorized,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Setup errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("File error: {0}")]
    Io(String),
}

/// Error payload handed to the view layer
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ConsoleError {
    pub fn code(&self) -> &'static str {
        match self {
            ConsoleError::Validation(_) => "VALIDATION_ERROR",
            ConsoleError::Editor(_) => "EDITOR_ERROR",
            ConsoleError::Workflow(_) => "INVALID_STATE",
            ConsoleError::DuplicateInvoice(_) => "DUPLICATE_INVOICE",
            ConsoleError::Transport(_) => "TRANSPORT_ERROR",
            ConsoleError::Server { .. } => "SERVER_ERROR",
            ConsoleError::Unauthorized => "UNAUTHORIZED",
            ConsoleError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            ConsoleError::Decode(_) => "DECODE_ERROR",
            ConsoleError::NotFound(_) => "NOT_FOUND",
            ConsoleError::Configuration(_) => "CONFIGURATION_ERROR",
            ConsoleError::Export(_) => "EXPORT_ERROR",
            ConsoleError::Io(_) => "IO_ERROR",
        }
    }

    /// Message suitable for a toast or inline error
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Validation(e) => e.to_string(),
            ConsoleError::Editor(e) => e.to_string(),
            ConsoleError::Workflow(e) => e.to_string(),
            ConsoleError::DuplicateInvoice(number) => {
                format!("Invoice {} has already been registered", number)
            }
            ConsoleError::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            ConsoleError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ConsoleError::InvalidCredentials(_) => "Username and password are required".to_string(),
            ConsoleError::NotFound(what) => format!("{} not found", what),
            ConsoleError::Configuration(msg) => format!("Configuration error: {}", msg),
            ConsoleError::Io(msg) => format!("File error: {}", msg),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        let mark = match self {
            ConsoleError::Validation(e) => Some(e.mark()),
            ConsoleError::DuplicateInvoice(_) => Some(shared::FieldMark {
                line: None,
                field: "invoiceNumber",
            }),
            _ => None,
        };

        ErrorDetail {
            code: self.code(),
            message: self.user_message(),
            field: mark.map(|m| m.field),
            line: mark.and_then(|m| m.line),
        }
    }

    /// Errors that came back from (or failed to reach) the remote services
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ConsoleError::Transport(_)
                | ConsoleError::Server { .. }
                | ConsoleError::Unauthorized
                | ConsoleError::Decode(_)
                | ConsoleError::NotFound(_)
        )
    }
}

impl ConsoleError {
    /// Map a failed file access, keeping "missing" apart from other I/O failures
    pub fn from_io(path: &std::path::Path, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => ConsoleError::NotFound(path.display().to_string()),
            _ => ConsoleError::Io(format!("{}: {}", path.display(), e)),
        }
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ConsoleError::Decode(e.to_string())
        } else {
            ConsoleError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(e: serde_json::Error) -> Self {
        ConsoleError::Decode(e.to_string())
    }
}

impl From<config::ConfigError> for ConsoleError {
    fn from(e: config::ConfigError) -> Self {
        ConsoleError::Configuration(e.to_string())
    }
}

/// Result type alias for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
