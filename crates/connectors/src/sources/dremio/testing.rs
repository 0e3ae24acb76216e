//! In-memory [`JobApi`] with scripted job states, for unit tests.

use super::models::{JobResultsPage, JobState, JobStatus, Row, SchemaField};
use super::JobApi;
use async_trait::async_trait;
use quarry_error::{ErrorCode, QuarryError, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) fn running() -> JobStatus {
    JobStatus {
        job_state: JobState::Running,
        row_count: None,
        error_message: None,
    }
}

pub(crate) fn completed(rows: u64) -> JobStatus {
    JobStatus {
        job_state: JobState::Completed,
        row_count: Some(rows),
        error_message: None,
    }
}

/// Result content of a job: generated `id`/`name` rows, or fixed rows.
#[derive(Clone)]
enum JobData {
    Generated(usize),
    Fixed(Vec<SchemaField>, Vec<Row>),
}

impl JobData {
    fn total_rows(&self) -> usize {
        match self {
            JobData::Generated(n) => *n,
            JobData::Fixed(_, rows) => rows.len(),
        }
    }
}

struct JobScript {
    /// Front is returned next; the last entry repeats forever.
    states: VecDeque<JobStatus>,
    data: JobData,
}

#[derive(Clone)]
struct SqlScript {
    states: Vec<JobStatus>,
    data: JobData,
}

#[derive(Default)]
pub(crate) struct ScriptedApi {
    reject_login: bool,
    slow_first_pages: bool,
    status_delay: Option<Duration>,
    login_calls: AtomicUsize,
    next_job: AtomicUsize,
    by_sql: Mutex<HashMap<String, SqlScript>>,
    jobs: Mutex<HashMap<String, JobScript>>,
    submitted: Mutex<Vec<String>>,
    status_calls: Mutex<HashMap<String, usize>>,
    page_requests: Mutex<Vec<(usize, usize)>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rejecting_login(mut self) -> Self {
        self.reject_login = true;
        self
    }

    /// Pages at lower offsets answer later than pages at higher offsets.
    pub(crate) fn slow_first_pages(mut self) -> Self {
        self.slow_first_pages = true;
        self
    }

    /// Every status call takes `delay` before answering.
    pub(crate) fn slow_status(mut self, delay: Duration) -> Self {
        self.status_delay = Some(delay);
        self
    }

    pub(crate) fn script_job(&self, job_id: &str, states: Vec<JobStatus>) {
        self.script_job_with_rows(job_id, states, 0);
    }

    pub(crate) fn script_job_with_rows(
        &self,
        job_id: &str,
        states: Vec<JobStatus>,
        total_rows: usize,
    ) {
        self.install_job(job_id, states, JobData::Generated(total_rows));
    }

    fn install_job(&self, job_id: &str, states: Vec<JobStatus>, data: JobData) {
        self.jobs.lock().unwrap().insert(
            job_id.to_string(),
            JobScript {
                states: states.into(),
                data,
            },
        );
    }

    /// Statements submitted with this exact text run through `states`.
    pub(crate) fn on_sql(&self, sql: &str, states: Vec<JobStatus>, total_rows: usize) {
        self.by_sql.lock().unwrap().insert(
            sql.to_string(),
            SqlScript {
                states,
                data: JobData::Generated(total_rows),
            },
        );
    }

    /// Statements with this text complete at once and return exactly `rows`.
    pub(crate) fn on_sql_rows(&self, sql: &str, schema: Vec<SchemaField>, rows: Vec<Row>) {
        self.by_sql.lock().unwrap().insert(
            sql.to_string(),
            SqlScript {
                states: vec![completed(rows.len() as u64)],
                data: JobData::Fixed(schema, rows),
            },
        );
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub(crate) fn status_calls(&self, job_id: &str) -> usize {
        self.status_calls
            .lock()
            .unwrap()
            .get(job_id)
            .copied()
            .unwrap_or(0)
    }

    /// `(limit, offset)` of every results call, in request order.
    pub(crate) fn page_requests(&self) -> Vec<(usize, usize)> {
        self.page_requests.lock().unwrap().clone()
    }

    pub(crate) fn row(i: usize) -> Row {
        let mut row = Row::new();
        row.insert("id".to_string(), serde_json::json!(i));
        row.insert("name".to_string(), serde_json::json!(format!("row-{}", i)));
        row
    }
}

#[async_trait]
impl JobApi for ScriptedApi {
    async fn authenticate(&self, user: &str, _password: &str) -> Result<String> {
        let n = self.login_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject_login {
            return Err(QuarryError::new(
                ErrorCode::AuthenticationFailed,
                format!("Login failed for {}", user),
            ));
        }
        Ok(format!("token-{}", n))
    }

    async fn submit_query(&self, _token: &str, sql: &str) -> Result<String> {
        self.submitted.lock().unwrap().push(sql.to_string());
        let script = self.by_sql.lock().unwrap().get(sql).cloned();
        let script = script.ok_or_else(|| {
            QuarryError::new(ErrorCode::UnexpectedStatus, "POST /api/v3/sql returned 400")
        })?;

        let job_id = format!("job-{}", self.next_job.fetch_add(1, Ordering::SeqCst) + 1);
        self.install_job(&job_id, script.states, script.data);
        Ok(job_id)
    }

    async fn job_status(&self, _token: &str, job_id: &str) -> Result<JobStatus> {
        *self
            .status_calls
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_default() += 1;

        if let Some(delay) = self.status_delay {
            tokio::time::sleep(delay).await;
        }

        let mut jobs = self.jobs.lock().unwrap();
        let script = jobs.get_mut(job_id).ok_or_else(|| {
            QuarryError::new(ErrorCode::TransportFailure, "connection reset by peer")
        })?;
        let status = if script.states.len() > 1 {
            script.states.pop_front()
        } else {
            script.states.front().cloned()
        };
        status.ok_or_else(|| QuarryError::new(ErrorCode::InvalidResponse, "empty script"))
    }

    async fn results_page(
        &self,
        _token: &str,
        job_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<JobResultsPage> {
        self.page_requests.lock().unwrap().push((limit, offset));

        let data = self
            .jobs
            .lock()
            .unwrap()
            .get(job_id)
            .map(|s| s.data.clone())
            .ok_or_else(|| QuarryError::new(ErrorCode::TransportFailure, "unknown job"))?;
        let total_rows = data.total_rows();

        if self.slow_first_pages {
            let delay = total_rows.saturating_sub(offset) as u64;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let end = (offset + limit).min(total_rows);
        let start = offset.min(end);
        let (schema, rows) = match data {
            JobData::Generated(_) => (
                vec![
                    SchemaField::new("id", "BIGINT"),
                    SchemaField::new("name", "VARCHAR"),
                ],
                (start..end).map(Self::row).collect(),
            ),
            JobData::Fixed(schema, rows) => (schema, rows[start..end].to_vec()),
        };
        Ok(JobResultsPage {
            row_count: Some(total_rows as u64),
            schema,
            rows,
        })
    }
}
