//! Query orchestration: batches of targets, variable lookups and the connectivity check.

use super::client::HttpJobClient;
use super::frame::ResultFrame;
use super::paginator::{FetchedRows, Paginator};
use super::poller::JobPoller;
use super::session::Session;
use super::models::SchemaField;
use super::JobApi;
use futures::future::join_all;
use quarry_common::config::{AppConfig, QueryDefaults, VariableSettings};
use quarry_common::scrubber::log_preview;
use quarry_error::{suggest_closest, ErrorContext, QuarryError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Request id used for variable lookups.
pub const VARIABLE_REF_ID: &str = "var";

const DEFAULT_HEALTH_ERROR: &str = "Cannot connect to API";

/// One statement of a batch. Unset options fall back to the configured query defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTarget {
    pub ref_id: String,
    #[serde(default)]
    pub query_text: Option<String>,
    /// Seconds to wait for the job before giving up.
    #[serde(default)]
    pub query_timeout: Option<u64>,
    #[serde(default)]
    pub time_col: Option<String>,
    #[serde(default)]
    pub max_records: Option<usize>,
}

impl QueryTarget {
    pub fn new(ref_id: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            query_text: Some(query_text.into()),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.query_timeout = Some(secs);
        self
    }

    pub fn with_time_col(mut self, time_col: impl Into<String>) -> Self {
        self.time_col = Some(time_col.into());
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// The statement to run, or `None` when there is nothing but whitespace.
    pub fn statement(&self) -> Option<&str> {
        self.query_text
            .as_deref()
            .map(str::trim)
            .filter(|sql| !sql.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub targets: Vec<QueryTarget>,
}

impl QueryRequest {
    pub fn new(targets: Vec<QueryTarget>) -> Self {
        Self { targets }
    }
}

/// Outcome of one target.
#[derive(Debug, Clone)]
pub struct TargetResult {
    pub ref_id: String,
    pub result: std::result::Result<ResultFrame, QuarryError>,
}

/// One result per target, in target order.
#[derive(Debug, Clone, Default)]
pub struct QueryResponse {
    pub data: Vec<TargetResult>,
}

impl QueryResponse {
    pub fn frames(&self) -> impl Iterator<Item = &ResultFrame> {
        self.data.iter().filter_map(|t| t.result.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &QuarryError)> {
        self.data
            .iter()
            .filter_map(|t| t.result.as_ref().err().map(|e| (t.ref_id.as_str(), e)))
    }

    pub fn get(&self, ref_id: &str) -> Option<&TargetResult> {
        self.data.iter().find(|t| t.ref_id == ref_id)
    }

    pub fn is_success(&self) -> bool {
        self.data.iter().all(|t| t.result.is_ok())
    }

    /// Some targets failed while others succeeded.
    pub fn is_partial_failure(&self) -> bool {
        let failed = self.errors().count();
        failed > 0 && failed < self.data.len()
    }
}

/// A variable lookup: run `raw_query` and list the distinct values of `column`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableQuery {
    #[serde(default)]
    pub raw_query: Option<String>,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFindValue {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthCheck {
    pub fn is_success(&self) -> bool {
        self.status == HealthStatus::Success
    }
}

/// Runs statements as remote jobs.
///
/// Owns the session: the first statement that needs a token logs in, and every
/// later call on this instance reuses the token.
pub struct DremioDataSource {
    api: Arc<dyn JobApi>,
    session: Session,
    defaults: QueryDefaults,
    variables: VariableSettings,
    poller: JobPoller,
    paginator: Paginator,
}

impl DremioDataSource {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = HttpJobClient::from_settings(&config.datasource)?;
        Ok(Self::with_api(Arc::new(client), config))
    }

    /// Build on any [`JobApi`] implementation, taking everything else from `config`.
    pub fn with_api(api: Arc<dyn JobApi>, config: &AppConfig) -> Self {
        let password = config
            .datasource
            .password
            .clone()
            .unwrap_or_else(|| SecretString::from(String::new()));

        Self {
            api,
            session: Session::new(config.datasource.user.clone(), password),
            defaults: config.query.clone(),
            variables: config.variables,
            poller: JobPoller::from_settings(&config.poll),
            paginator: Paginator::from_settings(&config.pagination),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run every target of `request` concurrently.
    ///
    /// Returns `Err` only when a token is needed and login fails. Failures of a single
    /// target land in that target's slot of the response and do not affect the others.
    /// Targets without a statement yield an empty frame and never reach the network.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let runnable = request
            .targets
            .iter()
            .filter(|t| t.statement().is_some())
            .count();
        tracing::info!(
            targets = request.targets.len(),
            runnable,
            "Running query batch"
        );

        let token = if runnable > 0 {
            self.session
                .token(self.api.as_ref())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Login failed, batch aborted");
                    e
                })?
        } else {
            ""
        };

        let data = join_all(request.targets.iter().map(|target| {
            let span = tracing::info_span!("target", ref_id = %target.ref_id);
            self.run_target(token, target).instrument(span)
        }))
        .await;

        Ok(QueryResponse { data })
    }

    async fn run_target(&self, token: &str, target: &QueryTarget) -> TargetResult {
        let ref_id = target.ref_id.as_str();
        let Some(sql) = target.statement() else {
            tracing::debug!("Empty statement, returning empty frame");
            return TargetResult {
                ref_id: ref_id.to_string(),
                result: Ok(ResultFrame::empty(ref_id)),
            };
        };

        let timeout =
            Duration::from_secs(target.query_timeout.unwrap_or(self.defaults.timeout_secs));
        let max_records = target.max_records.unwrap_or(self.defaults.max_records);
        let time_col = target
            .time_col
            .as_deref()
            .unwrap_or(&self.defaults.time_col);

        let result = self
            .run_job(token, ref_id, sql, timeout, max_records)
            .await
            .map(|fetched| ResultFrame::from_rows(ref_id, &fetched.schema, &fetched.rows, time_col));

        match &result {
            Ok(frame) => tracing::debug!(
                rows = frame.len(),
                fields = frame.fields.len(),
                "Target completed"
            ),
            Err(e) => tracing::warn!(error = %e, "Target failed"),
        }

        TargetResult {
            ref_id: ref_id.to_string(),
            result,
        }
    }

    /// Submit, wait and page through one statement.
    async fn run_job(
        &self,
        token: &str,
        ref_id: &str,
        sql: &str,
        timeout: Duration,
        max_records: usize,
    ) -> Result<FetchedRows> {
        let api = self.api.as_ref();
        let job_id = api
            .submit_query(token, sql)
            .await
            .map_err(|e| e.for_request(ref_id))?;
        tracing::info!(
            ref_id,
            job_id = %job_id,
            sql = %log_preview(sql),
            "Submitted query"
        );

        let available = self
            .poller
            .wait(api, token, &job_id, ref_id, timeout)
            .await?;

        self.paginator
            .fetch(api, token, &job_id, available, max_records)
            .await
            .map_err(|e| {
                e.for_request(ref_id).with_context(ErrorContext::Job {
                    request_id: ref_id.to_string(),
                    job_id: Some(job_id.clone()),
                    state: Some("COMPLETED".to_string()),
                })
            })
    }

    /// Distinct non-empty values of `query.column`, in first-seen order.
    ///
    /// Runs with the fixed variable timeout and record cap. A column that is not part
    /// of the result yields an empty list.
    pub async fn metric_find_query(&self, query: &VariableQuery) -> Result<Vec<MetricFindValue>> {
        let Some(sql) = query
            .raw_query
            .as_deref()
            .map(str::trim)
            .filter(|sql| !sql.is_empty())
        else {
            return Ok(Vec::new());
        };

        let token = self.session.token(self.api.as_ref()).await?;
        let fetched = self
            .run_job(
                token,
                VARIABLE_REF_ID,
                sql,
                Duration::from_secs(self.variables.timeout_secs),
                self.variables.max_records,
            )
            .await?;

        if !fetched.schema.is_empty() && !fetched.schema.iter().any(|f| f.name == query.column) {
            match column_suggestion(&fetched.schema, &query.column) {
                Some(suggestion) => tracing::warn!(
                    column = %query.column,
                    "Column not in lookup result. Did you mean '{}'?",
                    suggestion
                ),
                None => {
                    let available: Vec<&str> =
                        fetched.schema.iter().map(|f| f.name.as_str()).collect();
                    tracing::warn!(
                        column = %query.column,
                        available = ?available,
                        "Column not in lookup result"
                    )
                }
            }
            return Ok(Vec::new());
        }

        let values = project_distinct(&fetched, &query.column);
        tracing::debug!(column = %query.column, values = values.len(), "Variable values");
        Ok(values)
    }

    /// Log in with the configured credentials and report whether that worked.
    ///
    /// Uses a fresh login and leaves the session's cached token alone. Never fails.
    pub async fn test_datasource(&self) -> HealthCheck {
        let result = self
            .api
            .authenticate(self.session.user(), self.session.password().expose_secret())
            .await;

        match result {
            Ok(_) => HealthCheck {
                status: HealthStatus::Success,
                message: "Success".to_string(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Connectivity check failed");
                HealthCheck {
                    status: HealthStatus::Error,
                    message: health_message(&e),
                }
            }
        }
    }
}

impl std::fmt::Debug for DremioDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DremioDataSource")
            .field("session", &self.session)
            .field("defaults", &self.defaults)
            .field("poller", &self.poller)
            .field("paginator", &self.paginator)
            .finish()
    }
}

/// A status reason for HTTP rejections, otherwise the error text.
fn health_message(err: &QuarryError) -> String {
    if let Some(ErrorContext::Http {
        status: Some(status),
        ..
    }) = &err.context
    {
        return reqwest::StatusCode::from_u16(*status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or(DEFAULT_HEALTH_ERROR)
            .to_string();
    }
    if err.message.trim().is_empty() {
        DEFAULT_HEALTH_ERROR.to_string()
    } else {
        err.message.clone()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Closest schema column name to a column that is not in the schema.
fn column_suggestion(schema: &[SchemaField], column: &str) -> Option<String> {
    let names: Vec<String> = schema.iter().map(|f| f.name.clone()).collect();
    suggest_closest(column, &names)
}

fn project_distinct(fetched: &FetchedRows, column: &str) -> Vec<MetricFindValue> {
    let mut seen = HashSet::new();
    fetched
        .rows
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|value| is_truthy(value))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .filter(|text| seen.insert(text.clone()))
        .map(|text| MetricFindValue { text })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::dremio::frame::FieldType;
    use crate::sources::dremio::models::{JobState, JobStatus, Row, SchemaField};
    use crate::sources::dremio::testing::{completed, running, ScriptedApi};
    use quarry_error::ErrorCode;
    use serde_json::json;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.datasource.user = "admin".to_string();
        config.datasource.password = Some(SecretString::from("secret".to_string()));
        config.poll.interval_ms = 10;
        config
    }

    fn source(api: &Arc<ScriptedApi>) -> DremioDataSource {
        DremioDataSource::with_api(api.clone(), &config())
    }

    fn failed(message: &str) -> JobStatus {
        JobStatus {
            job_state: JobState::Failed,
            row_count: None,
            error_message: Some(message.to_string()),
        }
    }

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_empty_statements_never_reach_network() {
        let api = Arc::new(ScriptedApi::new());
        let ds = source(&api);

        let request = QueryRequest::new(vec![
            QueryTarget {
                ref_id: "A".to_string(),
                ..Default::default()
            },
            QueryTarget::new("B", ""),
            QueryTarget::new("C", "   \n"),
        ]);
        let response = ds.query(&request).await.unwrap();

        assert_eq!(response.data.len(), 3);
        for (target, ref_id) in response.data.iter().zip(["A", "B", "C"]) {
            assert_eq!(target.ref_id, ref_id);
            let frame = target.result.as_ref().unwrap();
            assert!(frame.fields.is_empty());
            assert_eq!(frame.ref_id, ref_id);
        }
        assert_eq!(api.login_calls(), 0);
        assert!(api.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_single_target_end_to_end() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql("SELECT * FROM t", vec![running(), completed(3)], 3);
        let ds = source(&api);

        let request = QueryRequest::new(vec![QueryTarget::new("A", "SELECT * FROM t")]);
        let response = ds.query(&request).await.unwrap();

        let frame = response.get("A").unwrap().result.as_ref().unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.field("id").unwrap().field_type, FieldType::Number);
        assert_eq!(frame.field("name").unwrap().values[2], json!("row-2"));
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql("SELECT 1", vec![completed(1)], 1);
        let ds = source(&api);
        let request = QueryRequest::new(vec![
            QueryTarget::new("A", "SELECT 1"),
            QueryTarget::new("B", "SELECT 1"),
        ]);

        ds.query(&request).await.unwrap();
        ds.query(&request).await.unwrap();

        assert_eq!(api.login_calls(), 1);
        assert_eq!(api.submitted().len(), 4);
        assert!(ds.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_one_failing_target_keeps_the_others() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql("SELECT a", vec![completed(2)], 2);
        api.on_sql("SELECT b", vec![running(), failed("Table 'b' not found")], 0);
        api.on_sql("SELECT c", vec![completed(5)], 5);
        let ds = source(&api);

        let request = QueryRequest::new(vec![
            QueryTarget::new("A", "SELECT a"),
            QueryTarget::new("B", "SELECT b"),
            QueryTarget::new("C", "SELECT c"),
        ]);
        let response = ds.query(&request).await.unwrap();

        assert_eq!(response.data.len(), 3);
        assert_eq!(response.get("A").unwrap().result.as_ref().unwrap().len(), 2);
        assert_eq!(response.get("C").unwrap().result.as_ref().unwrap().len(), 5);

        let err = response.get("B").unwrap().result.as_ref().unwrap_err();
        assert_eq!(err.code, ErrorCode::JobFailed);
        assert_eq!(err.message, "Query B failed. Table 'b' not found");
        assert!(response.is_partial_failure());
        assert_eq!(response.errors().count(), 1);
    }

    #[tokio::test]
    async fn test_submit_error_is_scoped_to_target() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql("SELECT a", vec![completed(1)], 1);
        let ds = source(&api);

        let request = QueryRequest::new(vec![
            QueryTarget::new("A", "SELECT a"),
            QueryTarget::new("B", "SELEC b"),
        ]);
        let response = ds.query(&request).await.unwrap();

        assert!(response.get("A").unwrap().result.is_ok());
        let err = response.get("B").unwrap().result.as_ref().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedStatus);
        assert_eq!(err.trace_id.as_deref(), Some("B"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_does_not_block_siblings() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql("SELECT slow", vec![running()], 0);
        api.on_sql("SELECT fast", vec![running(), completed(1)], 1);
        let ds = source(&api);

        let request = QueryRequest::new(vec![
            QueryTarget::new("slow", "SELECT slow").with_timeout(2),
            QueryTarget::new("fast", "SELECT fast"),
        ]);
        let response = ds.query(&request).await.unwrap();

        let err = response.get("slow").unwrap().result.as_ref().unwrap_err();
        assert_eq!(err.code, ErrorCode::JobTimeout);
        assert_eq!(err.message, "Query slow timed out");
        assert!(response.get("fast").unwrap().result.is_ok());
    }

    #[tokio::test]
    async fn test_login_failure_fails_the_batch() {
        let api = Arc::new(ScriptedApi::new().rejecting_login());
        let ds = source(&api);

        let request = QueryRequest::new(vec![QueryTarget::new("A", "SELECT 1")]);
        let err = ds.query(&request).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::AuthenticationFailed);
        assert!(api.submitted().is_empty());
        assert!(!ds.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_target_options_and_defaults() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql("SELECT big", vec![completed(1200)], 1200);
        api.on_sql("SELECT capped", vec![completed(1200)], 1200);
        let ds = source(&api);

        let request = QueryRequest::new(vec![QueryTarget::new("A", "SELECT big")]);
        let response = ds.query(&request).await.unwrap();
        assert_eq!(response.get("A").unwrap().result.as_ref().unwrap().len(), 1200);
        assert_eq!(api.page_requests(), vec![(500, 0), (500, 500), (200, 1000)]);

        let request = QueryRequest::new(vec![QueryTarget::new("B", "SELECT capped")
            .with_max_records(10)
            .with_time_col("id")]);
        let response = ds.query(&request).await.unwrap();
        let frame = response.get("B").unwrap().result.as_ref().unwrap();
        assert_eq!(frame.len(), 10);
        assert_eq!(frame.field("id").unwrap().field_type, FieldType::Time);
        assert_eq!(api.page_requests().last(), Some(&(10, 0)));
    }

    #[tokio::test]
    async fn test_metric_find_query_distinct_truthy_values() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql_rows(
            "SELECT region FROM sales",
            vec![SchemaField::new("region", "VARCHAR")],
            rows(vec![
                json!({"region": "emea"}),
                json!({"region": ""}),
                json!({"region": "apac"}),
                json!({"region": null}),
                json!({"region": "emea"}),
                json!({"other": "x"}),
                json!({"region": "amer"}),
            ]),
        );
        let ds = source(&api);

        let values = ds
            .metric_find_query(&VariableQuery {
                raw_query: Some("SELECT region FROM sales".to_string()),
                column: "region".to_string(),
            })
            .await
            .unwrap();

        let texts: Vec<&str> = values.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(texts, vec!["emea", "apac", "amer"]);
    }

    #[tokio::test]
    async fn test_metric_find_query_numbers_and_zero() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql("SELECT id", vec![completed(4)], 4);
        let ds = source(&api);

        let values = ds
            .metric_find_query(&VariableQuery {
                raw_query: Some("SELECT id".to_string()),
                column: "id".to_string(),
            })
            .await
            .unwrap();

        // id 0 is falsy
        let texts: Vec<&str> = values.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_metric_find_query_empty_and_missing_column() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql("SELECT id", vec![completed(2)], 2);
        let ds = source(&api);

        let empty = ds
            .metric_find_query(&VariableQuery {
                raw_query: None,
                column: "id".to_string(),
            })
            .await
            .unwrap();
        assert!(empty.is_empty());
        assert_eq!(api.login_calls(), 0);

        let missing = ds
            .metric_find_query(&VariableQuery {
                raw_query: Some("SELECT id".to_string()),
                column: "nmae".to_string(),
            })
            .await
            .unwrap();
        assert!(missing.is_empty());
        assert_eq!(api.submitted(), vec!["SELECT id".to_string()]);
    }

    #[test]
    fn test_column_suggestion_for_missing_column() {
        let schema = vec![
            SchemaField::new("id", "BIGINT"),
            SchemaField::new("name", "VARCHAR"),
        ];
        assert_eq!(column_suggestion(&schema, "nmae"), Some("name".to_string()));
        assert_eq!(column_suggestion(&schema, "hostname_fqdn"), None);
        assert_eq!(column_suggestion(&[], "name"), None);
    }

    #[tokio::test]
    async fn test_metric_find_query_propagates_job_failure() {
        let api = Arc::new(ScriptedApi::new());
        api.on_sql("SELECT broken", vec![failed("boom")], 0);
        let ds = source(&api);

        let err = ds
            .metric_find_query(&VariableQuery {
                raw_query: Some("SELECT broken".to_string()),
                column: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Query var failed. boom");
    }

    #[tokio::test]
    async fn test_datasource_check() {
        let api = Arc::new(ScriptedApi::new());
        let ds = source(&api);
        let check = ds.test_datasource().await;
        assert!(check.is_success());
        assert_eq!(check.message, "Success");
        assert!(!ds.session().is_authenticated());

        let api = Arc::new(ScriptedApi::new().rejecting_login());
        let ds = source(&api);
        let check = ds.test_datasource().await;
        assert_eq!(check.status, HealthStatus::Error);
        assert_eq!(check.message, "Login failed for admin");
    }

    #[test]
    fn test_health_message_prefers_status_reason() {
        let err = QuarryError::new(ErrorCode::AuthenticationFailed, "POST /apiv2/login returned 401")
            .with_context(ErrorContext::Http {
                method: "POST".to_string(),
                url: "http://dremio/apiv2/login".to_string(),
                status: Some(401),
            });
        assert_eq!(health_message(&err), "Unauthorized");

        let err = QuarryError::new(ErrorCode::TransportFailure, "");
        assert_eq!(health_message(&err), DEFAULT_HEALTH_ERROR);
    }

    #[test]
    fn test_query_target_from_yaml() {
        let target: QueryTarget = serde_yaml::from_str(
            "refId: A\nqueryText: SELECT 1\nqueryTimeout: 5\nmaxRecords: 20\n",
        )
        .unwrap();
        assert_eq!(
            target,
            QueryTarget::new("A", "SELECT 1")
                .with_timeout(5)
                .with_max_records(20)
        );
        assert_eq!(target.time_col, None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
    }
}
