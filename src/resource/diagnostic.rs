//! User-visible diagnostics
//!
//! Every failure that reaches the engine is reported as a diagnostic naming
//! the resource type, the operation and the resource name.

use crate::tmc::error::{ErrorCode, TmcError};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Lifecycle operation a diagnostic was raised from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Plan,
}

impl Operation {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Plan => "plan",
        }
    }

    fn gerund(self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Read => "reading",
            Self::Update => "updating",
            Self::Delete => "deleting",
            Self::Plan => "planning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            code: None,
        }
    }

    /// Wrap an operation failure, e.g. "Failed to create tmc_aws_cluster"
    pub fn from_error(type_name: &str, op: Operation, name: &str, err: &TmcError) -> Self {
        Self {
            severity: Severity::Error,
            summary: format!("Failed to {} {}", op.verb(), type_name),
            detail: format!("Error {} resource {}: {}", op.gerund(), name, err),
            code: Some(err.code()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.detail)
    }
}

impl std::error::Error for Diagnostic {}
