//! Process exit codes.
//!
//! Scripts can tell a bad config file from an unreachable service from a failing
//! statement without parsing output.

use quarry_error::{ErrorCategory, QuarryError};

pub const SUCCESS: i32 = 0;

/// Anything not covered below
pub const GENERAL_ERROR: i32 = 1;

/// Invalid arguments or an unreadable batch file
pub const USAGE_ERROR: i32 = 2;

/// Configuration file missing, unparsable or invalid
pub const CONFIG_ERROR: i32 = 3;

/// Service unreachable, request timed out or answered with an unexpected status
pub const CONNECTION_ERROR: i32 = 4;

/// Job failed, timed out or returned something unusable
pub const QUERY_ERROR: i32 = 5;

/// Login rejected
pub const AUTH_ERROR: i32 = 7;

/// Some targets of a batch succeeded, others failed
pub const PARTIAL_FAILURE: i32 = 8;

pub fn for_category(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::Connection => CONNECTION_ERROR,
        ErrorCategory::Query => QUERY_ERROR,
        ErrorCategory::Config => CONFIG_ERROR,
        ErrorCategory::Auth => AUTH_ERROR,
        ErrorCategory::Internal => GENERAL_ERROR,
        _ => GENERAL_ERROR,
    }
}

pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(quarry_err) = err.downcast_ref::<QuarryError>() {
        return for_category(quarry_err.category());
    }

    // errors raised before any request, mostly while loading files
    let s = format!("{:#}", err).to_lowercase();
    if s.contains("config") || s.contains("yaml") {
        return CONFIG_ERROR;
    }
    if s.contains("batch file") {
        return USAGE_ERROR;
    }
    GENERAL_ERROR
}
