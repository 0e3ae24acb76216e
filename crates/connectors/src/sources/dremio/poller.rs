//! Drives a submitted job to `COMPLETED`, `FAILED` or a client-side timeout.

use super::models::JobState;
use super::JobApi;
use quarry_common::config::PollSettings;
use quarry_error::{QuarryError, Result};
use std::time::Duration;
use tokio::time::Instant;

/// Polls are never closer together than this, whatever the configuration says.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Deadline used when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone, Copy)]
pub struct JobPoller {
    interval: Duration,
}

impl JobPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn from_settings(settings: &PollSettings) -> Self {
        Self::new(Duration::from_millis(settings.interval_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for `job_id` to finish and return its row count.
    ///
    /// The deadline is fixed when polling starts and also bounds an in-flight status
    /// request. Giving up is client-side only: nothing is sent to cancel the job.
    pub async fn wait(
        &self,
        api: &dyn JobApi,
        token: &str,
        job_id: &str,
        request_id: &str,
        timeout: Duration,
    ) -> Result<u64> {
        let start = Instant::now();
        let deadline = start
            .checked_add(timeout)
            .unwrap_or_else(|| start + FAR_FUTURE);
        let mut last_state: Option<JobState> = None;
        let mut polls: u32 = 0;

        loop {
            let status = match tokio::time::timeout_at(deadline, api.job_status(token, job_id))
                .await
            {
                Ok(status) => status.map_err(|e| e.for_request(request_id))?,
                Err(_) => return Err(self.timed_out(request_id, job_id, last_state.as_ref(), polls)),
            };
            polls += 1;

            tracing::debug!(
                ref_id = request_id,
                job_id,
                state = %status.job_state,
                poll = polls,
                "Job state"
            );

            match status.job_state {
                JobState::Completed => {
                    let rows = status.row_count.unwrap_or(0);
                    tracing::debug!(ref_id = request_id, job_id, rows, polls, "Job completed");
                    return Ok(rows);
                }
                JobState::Failed => {
                    let message = status.error_message.unwrap_or_default();
                    tracing::warn!(
                        ref_id = request_id,
                        job_id,
                        error = %message,
                        "Job failed"
                    );
                    return Err(QuarryError::job_failed(request_id, job_id, &message));
                }
                state => last_state = Some(state),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(self.timed_out(request_id, job_id, last_state.as_ref(), polls));
            }
            let next_poll = now
                .checked_add(self.interval)
                .map_or(deadline, |next| next.min(deadline));
            tokio::time::sleep_until(next_poll).await;
        }
    }

    fn timed_out(
        &self,
        request_id: &str,
        job_id: &str,
        last_state: Option<&JobState>,
        polls: u32,
    ) -> QuarryError {
        tracing::warn!(
            ref_id = request_id,
            job_id,
            last_state = last_state.map(JobState::as_str).unwrap_or("unknown"),
            polls,
            "Gave up waiting for job"
        );
        QuarryError::job_timeout(request_id, job_id, last_state.map(JobState::as_str))
    }
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::from_settings(&PollSettings::default())
    }
}
