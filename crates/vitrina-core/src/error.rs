//! Error types module
//!
//! All failures surfaced by the Vitrina client are unified under [`AppError`].
//! Validation failures are raised locally before any request is sent, HTTP
//! failures carry the response status, and cancelled requests are kept apart
//! so the orchestration layer can drop them silently.

use std::io;

use crate::validation::FileValidationError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected outcomes like cancelled requests
    Debug,
    /// Warning level - for user-correctable failures like validation errors
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] FileValidationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error("HTTP error! status: {status}{}", format_detail(.message))]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn format_detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(" - {}", message)
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status embedded in the error, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Superseded or intentionally aborted requests are expected, not failures.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }

    /// Raised locally, before any network call was attempted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::InvalidInput(_)
                | AppError::SlugTaken(_)
                | AppError::Config(_)
        )
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::Cancelled => LogLevel::Debug,
            AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::SlugTaken(_)
            | AppError::NotFound(_) => LogLevel::Warn,
            AppError::Http { status, .. } if *status < 500 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}
