//! # Error Contexts
//!
//! Structured metadata attached to errors so callers can react without parsing messages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// Context for QUARRY-2001 / 2002 (job failure and timeout)
    Job {
        request_id: String,
        job_id: Option<String>,
        /// Last job state observed by the poller
        state: Option<String>,
    },

    /// Context for transport errors (QUARRY-1001, 1002, 1003)
    Http {
        method: String,
        url: String,
        status: Option<u16>,
    },

    /// Context for QUARRY-4001
    Auth { user: Option<String> },

    /// Context for QUARRY-3xxx
    Config {
        file_path: Option<String>,
        field: Option<String>,
    },

    /// Context for QUARRY-2004 (FieldNotFound)
    FieldNotFound {
        field: String,
        available_fields: Vec<String>,
    },
}
