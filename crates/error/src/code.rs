use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following QUARRY-XXXX format.
///
/// ## Code Ranges
/// - **1000-1999**: Transport errors (network, HTTP status)
/// - **2000-2999**: Query and job errors
/// - **3000-3999**: Configuration errors
/// - **4000-4999**: Authentication errors
/// - **5000-5999**: Internal errors
///
/// Codes are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Transport Errors (1000-1999) ===
    /// QUARRY-1001: Network failure talking to the query service
    TransportFailure = 1001,
    /// QUARRY-1002: HTTP request timed out
    ConnectionTimeout = 1002,
    /// QUARRY-1003: Query service answered with a non-success status
    UnexpectedStatus = 1003,

    // === Query Errors (2000-2999) ===
    /// QUARRY-2001: Job reported FAILED by the service
    JobFailed = 2001,
    /// QUARRY-2002: Job did not finish before the client deadline
    JobTimeout = 2002,
    /// QUARRY-2003: Response body did not match the expected shape
    InvalidResponse = 2003,
    /// QUARRY-2004: Column not present in the job result schema
    FieldNotFound = 2004,

    // === Configuration Errors (3000-3999) ===
    /// QUARRY-3001: Configuration failed to load or validate
    InvalidConfig = 3001,
    /// QUARRY-3002: Missing required field in config
    MissingRequiredField = 3002,
    /// QUARRY-3003: Base URL cannot be parsed
    InvalidUrl = 3003,

    // === Auth Errors (4000-4999) ===
    /// QUARRY-4001: Login rejected by the query service
    AuthenticationFailed = 4001,

    // === Internal Errors (5000-5999) ===
    /// QUARRY-5001: Serialization/deserialization failed
    SerializationFailed = 5001,
    /// QUARRY-5002: Unexpected internal state
    InternalPanic = 5002,

    /// QUARRY-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "QUARRY-2002")
    pub fn as_str(&self) -> String {
        format!("QUARRY-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            1000..=1999 => ErrorCategory::Connection,
            2000..=2999 => ErrorCategory::Query,
            3000..=3999 => ErrorCategory::Config,
            4000..=4999 => ErrorCategory::Auth,
            _ => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> String {
        code.as_str()
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        let num: u16 = s
            .strip_prefix("QUARRY-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| "Invalid format".to_string())?;
        Self::try_from(num).map_err(|_| "Unknown code".to_string())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(n: u16) -> std::result::Result<Self, Self::Error> {
        match n {
            1001 => Ok(Self::TransportFailure),
            1002 => Ok(Self::ConnectionTimeout),
            1003 => Ok(Self::UnexpectedStatus),
            2001 => Ok(Self::JobFailed),
            2002 => Ok(Self::JobTimeout),
            2003 => Ok(Self::InvalidResponse),
            2004 => Ok(Self::FieldNotFound),
            3001 => Ok(Self::InvalidConfig),
            3002 => Ok(Self::MissingRequiredField),
            3003 => Ok(Self::InvalidUrl),
            4001 => Ok(Self::AuthenticationFailed),
            5001 => Ok(Self::SerializationFailed),
            5002 => Ok(Self::InternalPanic),
            9999 => Ok(Self::Unknown),
            _ => Err(format!("Unknown error code: {}", n)),
        }
    }
}

/// High-level error category, used for CLI exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
    Connection,
    Query,
    Config,
    Auth,
    Internal,
}
