//! `reqwest` implementation of [`JobApi`].

use super::models::{
    ApiErrorBody, JobResultsPage, JobStatus, LoginRequest, LoginResponse, SubmitRequest,
    SubmitResponse,
};
use super::JobApi;
use async_trait::async_trait;
use quarry_common::config::DatasourceSettings;
use quarry_error::{ErrorCode, ErrorContext, QuarryError, Result};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Stateless HTTP client for the job API.
///
/// Holds no token: every authenticated call receives it from the caller and sends
/// it as `Authorization: <token_prefix><token>`.
#[derive(Debug, Clone)]
pub struct HttpJobClient {
    base_url: String,
    token_prefix: String,
    http: reqwest::Client,
}

impl HttpJobClient {
    pub fn new(
        base_url: &str,
        token_prefix: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let parsed = url::Url::parse(base_url).map_err(|e| {
            QuarryError::new(
                ErrorCode::InvalidUrl,
                format!("Invalid datasource url '{}': {}", base_url, e),
            )
            .with_context(ErrorContext::Config {
                file_path: None,
                field: Some("datasource.url".to_string()),
            })
        })?;

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                QuarryError::new(
                    ErrorCode::InternalPanic,
                    format!("Failed to build HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token_prefix: token_prefix.into(),
            http,
        })
    }

    pub fn from_settings(settings: &DatasourceSettings) -> Result<Self> {
        Self::new(
            &settings.url,
            settings.token_prefix.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder, token: &str) -> Result<RequestBuilder> {
        let mut value = HeaderValue::from_str(&format!("{}{}", self.token_prefix, token))
            .map_err(|_| {
                QuarryError::new(
                    ErrorCode::InvalidResponse,
                    "Session token contains characters not allowed in a header",
                )
            })?;
        value.set_sensitive(true);
        Ok(request.header(AUTHORIZATION, value))
    }

    /// Send a request and decode a JSON body, classifying failures.
    ///
    /// Non-success statuses become `failure_code` errors carrying the status and,
    /// when present, the service's `errorMessage`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: Method,
        url: &str,
        failure_code: ErrorCode,
    ) -> Result<T> {
        let start = Instant::now();
        let http_context = |status: Option<u16>| ErrorContext::Http {
            method: method.to_string(),
            url: url.to_string(),
            status,
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, url, error = %e, "Request to query service failed");
            QuarryError::from(e).with_context(http_context(None))
        })?;

        let status = response.status();
        tracing::debug!(
            %method,
            url,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Query service responded"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error_message)
                .unwrap_or(body);
            let reason = status.canonical_reason().unwrap_or("Unknown status");

            let message = if detail.trim().is_empty() {
                format!("{} {} returned {} {}", method, url, status.as_u16(), reason)
            } else {
                format!(
                    "{} {} returned {} {}: {}",
                    method,
                    url,
                    status.as_u16(),
                    reason,
                    detail.trim()
                )
            };
            return Err(QuarryError::new(failure_code, message)
                .with_context(http_context(Some(status.as_u16()))));
        }

        response.json::<T>().await.map_err(|e| {
            QuarryError::new(
                ErrorCode::InvalidResponse,
                format!("Failed to parse response from {}: {}", url, e),
            )
            .with_context(http_context(Some(status.as_u16())))
        })
    }
}

#[async_trait]
impl JobApi for HttpJobClient {
    async fn authenticate(&self, user: &str, password: &str) -> Result<String> {
        let url = self.endpoint("/apiv2/login");
        tracing::debug!(user, url = %url, "Logging in to query service");

        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&LoginRequest {
                user_name: user,
                password,
            });

        let login: LoginResponse = self
            .send_json(request, Method::POST, &url, ErrorCode::AuthenticationFailed)
            .await
            .map_err(|e| {
                if e.code == ErrorCode::AuthenticationFailed {
                    e.with_hint("Check datasource.user and datasource.password")
                } else {
                    e
                }
            })?;
        Ok(login.token)
    }

    async fn submit_query(&self, token: &str, sql: &str) -> Result<String> {
        let url = self.endpoint("/api/v3/sql");
        let request = self.authorize(
            self.http
                .post(&url)
                .header(CONTENT_TYPE, "application/json")
                .json(&SubmitRequest { sql }),
            token,
        )?;

        let submitted: SubmitResponse = self
            .send_json(request, Method::POST, &url, ErrorCode::UnexpectedStatus)
            .await?;
        Ok(submitted.id)
    }

    async fn job_status(&self, token: &str, job_id: &str) -> Result<JobStatus> {
        let url = self.endpoint(&format!("/api/v3/job/{}", job_id));
        let request = self.authorize(self.http.get(&url), token)?;
        self.send_json(request, Method::GET, &url, ErrorCode::UnexpectedStatus)
            .await
    }

    async fn results_page(
        &self,
        token: &str,
        job_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<JobResultsPage> {
        let url = self.endpoint(&format!("/api/v3/job/{}/results", job_id));
        let request = self.authorize(
            self.http
                .get(&url)
                .query(&[("limit", limit), ("offset", offset)]),
            token,
        )?;
        self.send_json(request, Method::GET, &url, ErrorCode::UnexpectedStatus)
            .await
    }
}
