//! Error types for TMC API operations

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the TMC client and the shape translator
#[derive(Debug, Error)]
pub enum TmcError {
    #[error("resource not found: {path}")]
    NotFound { path: String },

    #[error("authentication failed: {message}")]
    Unauthorized { message: String },

    #[error("permission denied: {message}")]
    Forbidden { message: String },

    #[error("resource version conflict: {message}")]
    Conflict { message: String },

    #[error("API request failed: {status} - {message}")]
    Remote { status: u16, message: String },

    #[error("unexpected response shape: {message}")]
    Decode { message: String },

    #[error("invalid configuration: {message}")]
    Validation { message: String },

    #[error("API token exchange failed: {message}")]
    Auth { message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Coarse error classification, carried on diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    Remote,
    Decode,
    Validation,
    Auth,
    Transport,
}

impl TmcError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Unauthorized { .. } => ErrorCode::Unauthorized,
            Self::Forbidden { .. } => ErrorCode::Forbidden,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::Remote { .. } => ErrorCode::Remote,
            Self::Decode { .. } => ErrorCode::Decode,
            Self::Validation { .. } => ErrorCode::Validation,
            Self::Auth { .. } => ErrorCode::Auth,
            Self::Transport(_) => ErrorCode::Transport,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for TmcError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TmcError>;
