//! Dremio job API source.
//!
//! A statement runs as a server-side job:
//!
//! 1. `POST /apiv2/login` once per [`DremioDataSource`] to obtain a session token.
//! 2. `POST /api/v3/sql` submits the statement and returns a job id.
//! 3. `GET /api/v3/job/{id}` is polled until the job is `COMPLETED` or `FAILED`,
//!    or the per-query deadline passes ([`poller`]).
//! 4. `GET /api/v3/job/{id}/results?limit=&offset=` pages through at most
//!    `min(rowCount, maxRecords)` rows, 500 per call ([`paginator`]).
//! 5. Rows are converted into a typed columnar [`ResultFrame`] ([`frame`]).

use async_trait::async_trait;
use quarry_error::Result;

pub mod client;
pub mod datasource;
pub mod frame;
pub mod models;
pub mod paginator;
pub mod poller;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use client::HttpJobClient;
pub use datasource::{
    DremioDataSource, HealthCheck, HealthStatus, MetricFindValue, QueryRequest, QueryResponse,
    QueryTarget, TargetResult, VariableQuery,
};
pub use frame::{Field, FieldType, ResultFrame};
pub use models::{JobResultsPage, JobState, JobStatus, Row, SchemaField};
pub use paginator::{PageRequest, Paginator};
pub use poller::JobPoller;
pub use session::Session;

/// Remote calls of the job API.
///
/// Implementations perform exactly one request per call and never retry; any
/// failure is returned to the caller.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Log in and return a session token.
    async fn authenticate(&self, user: &str, password: &str) -> Result<String>;

    /// Submit a statement, returning the job id.
    async fn submit_query(&self, token: &str, sql: &str) -> Result<String>;

    /// Fetch the current state of a job.
    async fn job_status(&self, token: &str, job_id: &str) -> Result<JobStatus>;

    /// Fetch `limit` result rows starting at `offset`.
    async fn results_page(
        &self,
        token: &str,
        job_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<JobResultsPage>;
}
