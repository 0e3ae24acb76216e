//! # quarry-error
//!
//! Unified error types for the Quarry remote query engine.
//!
//! Every failure surfaced to a caller carries:
//! - A stable numeric code (QUARRY-XXXX)
//! - Structured JSON context (request id, job id, HTTP status...)
//! - An optional hint for the person running the query

mod code;
mod context;
mod convert;

pub use code::{ErrorCategory, ErrorCode};
pub use context::ErrorContext;
pub use convert::suggest_closest;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unified error type for all Quarry operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuarryError {
    /// Numeric error code (e.g., "QUARRY-2002")
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Structured context for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Suggestion for fixing the failing query or configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Correlation ID, usually the request identifier of the failing target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl QuarryError {
    /// Create a new error with code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
            trace_id: None,
        }
    }

    /// Add structured context
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Add a hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Add trace ID for correlation
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// The job failed on the server side; `server_message` is what the service reported.
    pub fn job_failed(request_id: &str, job_id: &str, server_message: &str) -> Self {
        Self::new(
            ErrorCode::JobFailed,
            format!("Query {} failed. {}", request_id, server_message),
        )
        .with_context(ErrorContext::Job {
            request_id: request_id.to_string(),
            job_id: Some(job_id.to_string()),
            state: Some("FAILED".to_string()),
        })
        .with_trace_id(request_id)
    }

    /// The client-side poll deadline elapsed before the job reached a terminal state.
    pub fn job_timeout(request_id: &str, job_id: &str, last_state: Option<&str>) -> Self {
        Self::new(
            ErrorCode::JobTimeout,
            format!("Query {} timed out", request_id),
        )
        .with_context(ErrorContext::Job {
            request_id: request_id.to_string(),
            job_id: Some(job_id.to_string()),
            state: last_state.map(str::to_string),
        })
        .with_hint("Increase the query timeout or narrow the query")
        .with_trace_id(request_id)
    }

    /// Scope an error to the request that produced it.
    ///
    /// Leaves an existing trace id untouched.
    pub fn for_request(mut self, request_id: &str) -> Self {
        if self.trace_id.is_none() {
            self.trace_id = Some(request_id.to_string());
        }
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Serialize to JSON for API responses
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize QuarryError: {}", e);
            format!(
                r#"{{"code":"{}","message":"Serialization failed"}}"#,
                self.code
            )
        })
    }

    /// Serialize to pretty JSON for logging
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

impl fmt::Display for QuarryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (Hint: {})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for QuarryError {}

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;
