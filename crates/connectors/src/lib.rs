//! Remote query sources for Quarry.
//!
//! The only source today is the job-oriented Dremio REST API, see [`sources::dremio`].
pub mod sources;

pub use sources::dremio::{
    DremioDataSource, FieldType, HealthCheck, HealthStatus, HttpJobClient, JobApi, JobState,
    MetricFindValue, QueryRequest, QueryResponse, QueryTarget, ResultFrame, TargetResult,
    VariableQuery,
};
