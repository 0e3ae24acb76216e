use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Default constants
pub const DEFAULT_DATASOURCE_URL: &str = "http://localhost:9047";
pub const DEFAULT_TOKEN_PREFIX: &str = "_dremio";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TIME_COL: &str = "time_col";
pub const DEFAULT_MAX_RECORDS: usize = 10_000;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Maximum number of rows the results endpoint returns per call.
pub const PAGE_SIZE_CEILING: usize = 500;
pub const DEFAULT_PAGE_CONCURRENCY: usize = 1;

pub const DEFAULT_VARIABLE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_VARIABLE_MAX_RECORDS: usize = 10_000;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TELEMETRY_ENABLED: bool = false;
pub const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";
pub const DEFAULT_SERVICE_NAME: &str = "quarry";

pub const ENV_PREFIX: &str = "QUARRY";

fn serialize_secret<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(_) => serializer.serialize_str("[REDACTED]"),
        None => serializer.serialize_none(),
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(SecretString::from))
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[serde(default)]
    #[validate(nested)]
    pub datasource: DatasourceSettings,
    #[serde(default)]
    #[validate(nested)]
    pub query: QueryDefaults,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    #[validate(nested)]
    pub pagination: PaginationSettings,
    #[serde(default)]
    #[validate(nested)]
    pub variables: VariableSettings,
    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            datasource: DatasourceSettings::default(),
            query: QueryDefaults::default(),
            poll: PollSettings::default(),
            pagination: PaginationSettings::default(),
            variables: VariableSettings::default(),
            telemetry: TelemetryConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Connection settings for the remote query service.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct DatasourceSettings {
    #[serde(default = "default_datasource_url")]
    #[validate(custom(function = "validate_base_url"))]
    pub url: String,

    #[serde(default)]
    pub user: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub password: Option<SecretString>,

    /// Prepended verbatim to the session token in the `Authorization` header
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,

    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

impl Default for DatasourceSettings {
    fn default() -> Self {
        Self {
            url: default_datasource_url(),
            user: String::new(),
            password: None,
            token_prefix: default_token_prefix(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Values applied to query targets that leave them unset.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct QueryDefaults {
    #[serde(default = "default_query_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_time_col")]
    pub time_col: String,
    #[serde(default = "default_max_records")]
    #[validate(range(min = 1))]
    pub max_records: usize,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            timeout_secs: default_query_timeout_secs(),
            time_col: default_time_col(),
            max_records: default_max_records(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct PollSettings {
    /// Minimum spacing between two job status requests
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Validate)]
pub struct PaginationSettings {
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 500))]
    pub page_size: usize,
    /// Page fetches kept in flight at once; pages are always reassembled in offset order
    #[serde(default = "default_page_concurrency")]
    #[validate(range(min = 1, max = 16))]
    pub concurrency: usize,
}

impl PaginationSettings {
    /// Page size clamped to the service ceiling.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.clamp(1, PAGE_SIZE_CEILING)
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            concurrency: default_page_concurrency(),
        }
    }
}

/// Fixed parameters of the variable lookup path.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Validate)]
pub struct VariableSettings {
    #[serde(default = "default_variable_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_variable_max_records")]
    #[validate(range(min = 1))]
    pub max_records: usize,
}

impl Default for VariableSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_variable_timeout_secs(),
            max_records: default_variable_max_records(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_enabled")]
    pub enabled: bool,

    #[serde(default = "default_otlp_endpoint")]
    #[validate(url)]
    pub endpoint: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_telemetry_enabled(),
            endpoint: default_otlp_endpoint(),
            service_name: default_service_name(),
        }
    }
}

fn default_datasource_url() -> String {
    DEFAULT_DATASOURCE_URL.to_string()
}

fn default_token_prefix() -> String {
    DEFAULT_TOKEN_PREFIX.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_query_timeout_secs() -> u64 {
    DEFAULT_QUERY_TIMEOUT_SECS
}

fn default_time_col() -> String {
    DEFAULT_TIME_COL.to_string()
}

fn default_max_records() -> usize {
    DEFAULT_MAX_RECORDS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_page_size() -> usize {
    PAGE_SIZE_CEILING
}

fn default_page_concurrency() -> usize {
    DEFAULT_PAGE_CONCURRENCY
}

fn default_variable_timeout_secs() -> u64 {
    DEFAULT_VARIABLE_TIMEOUT_SECS
}

fn default_variable_max_records() -> usize {
    DEFAULT_VARIABLE_MAX_RECORDS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_telemetry_enabled() -> bool {
    DEFAULT_TELEMETRY_ENABLED
}

fn default_otlp_endpoint() -> String {
    DEFAULT_OTLP_ENDPOINT.to_string()
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn validate_base_url(url: &str) -> Result<(), validator::ValidationError> {
    if url.trim().is_empty() {
        return Err(validator::ValidationError::new("missing_url"));
    }

    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_url")),
    }
}

impl AppConfig {
    /// Load from an optional YAML file, then apply `QUARRY_` environment overrides.
    ///
    /// `QUARRY_DATASOURCE__URL` maps to `datasource.url`, `QUARRY_POLL__INTERVAL_MS`
    /// to `poll.interval_ms`, and so on.
    pub fn from_file(path: Option<&str>) -> Result<Self> {
        let builder = config::Config::builder();

        let builder = match path {
            Some(path) if std::path::Path::new(path).exists() => {
                builder.add_source(config::File::with_name(path))
            }
            Some(path) => anyhow::bail!("Configuration file not found: {}", path),
            None => builder,
        };

        let builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build().context("Failed to build configuration")?;

        let app_config: AppConfig = cfg
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

        Ok(app_config)
    }

    /// Parse configuration from a YAML document without environment overrides.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = cfg
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

        Ok(app_config)
    }
}
