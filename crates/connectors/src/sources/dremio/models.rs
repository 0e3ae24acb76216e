//! Wire types of the job REST API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One result row: column name to JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub user_name: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitRequest<'a> {
    pub sql: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// Error payload the service attaches to non-success responses.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Lifecycle state of a job as reported by the service.
///
/// Only `Completed` and `Failed` end polling. States this client does not know are
/// kept verbatim in `Other` and treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    NotSubmitted,
    Starting,
    Enqueued,
    Running,
    Completed,
    CancellationRequested,
    Canceled,
    Failed,
    Other(String),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobState::NotSubmitted => "NOT_SUBMITTED",
            JobState::Starting => "STARTING",
            JobState::Enqueued => "ENQUEUED",
            JobState::Running => "RUNNING",
            JobState::Completed => "COMPLETED",
            JobState::CancellationRequested => "CANCELLATION_REQUESTED",
            JobState::Canceled => "CANCELED",
            JobState::Failed => "FAILED",
            JobState::Other(s) => s,
        }
    }
}

impl From<String> for JobState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "NOT_SUBMITTED" => JobState::NotSubmitted,
            "STARTING" => JobState::Starting,
            "ENQUEUED" => JobState::Enqueued,
            "RUNNING" => JobState::Running,
            "COMPLETED" => JobState::Completed,
            "CANCELLATION_REQUESTED" => JobState::CancellationRequested,
            "CANCELED" => JobState::Canceled,
            "FAILED" => JobState::Failed,
            _ => JobState::Other(s),
        }
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> String {
        match state {
            JobState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub job_state: JobState,
    #[serde(default)]
    pub row_count: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RemoteType {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: RemoteType,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: RemoteType {
                name: type_name.into(),
            },
        }
    }
}

/// One page of `GET /api/v3/job/{id}/results`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobResultsPage {
    #[serde(default)]
    pub row_count: Option<u64>,
    #[serde(default)]
    pub schema: Vec<SchemaField>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_parsing() {
        let status: JobStatus =
            serde_json::from_str(r#"{"jobState":"COMPLETED","rowCount":42}"#).unwrap();
        assert_eq!(status.job_state, JobState::Completed);
        assert_eq!(status.row_count, Some(42));
        assert!(status.job_state.is_terminal());

        let status: JobStatus = serde_json::from_str(
            r#"{"jobState":"FAILED","errorMessage":"VALIDATION ERROR: Table 'x' not found"}"#,
        )
        .unwrap();
        assert_eq!(status.job_state, JobState::Failed);
        assert_eq!(
            status.error_message.as_deref(),
            Some("VALIDATION ERROR: Table 'x' not found")
        );
    }

    #[test]
    fn test_non_terminal_states() {
        for raw in [
            "NOT_SUBMITTED",
            "STARTING",
            "ENQUEUED",
            "RUNNING",
            "CANCELLATION_REQUESTED",
            "CANCELED",
            "PLANNING",
        ] {
            let state = JobState::from(raw.to_string());
            assert!(!state.is_terminal(), "{} must keep polling", raw);
            assert_eq!(state.as_str(), raw);
        }
        assert_eq!(
            JobState::from("PLANNING".to_string()),
            JobState::Other("PLANNING".to_string())
        );
    }

    #[test]
    fn test_results_page_parsing() {
        let page: JobResultsPage = serde_json::from_str(
            r#"{
                "rowCount": 2,
                "schema": [{"name": "code", "type": {"name": "VARCHAR"}}],
                "rows": [{"code": "1234"}, {"code": "5678"}]
            }"#,
        )
        .unwrap();
        assert_eq!(page.schema, vec![SchemaField::new("code", "VARCHAR")]);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[1]["code"], "5678");
    }

    #[test]
    fn test_login_request_field_names() {
        let body = serde_json::to_value(LoginRequest {
            user_name: "admin",
            password: "pw",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"userName": "admin", "password": "pw"}));
    }
}
