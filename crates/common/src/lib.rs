//! Common utilities and configuration shared across Quarry crates.
//!
//! - **Configuration**: Strongly typed application configuration (`config`).
//! - **Telemetry**: Logging and optional OTLP tracing setup (`telemetry`).
//! - **Scrubbing**: Redaction of SQL text before it reaches the logs (`scrubber`).
pub mod config;
pub mod scrubber;
pub mod telemetry;

pub use crate::config::{
    AppConfig, DatasourceSettings, PaginationSettings, PollSettings, QueryDefaults,
    TelemetryConfig, VariableSettings,
};
