//! Job identifiers, status, and lifecycle tracking.
//!
//! A job starts `Queued`, may pass through `Running`, and ends in one of
//! three terminal states: `Completed`, `Failed`, or `Cancelled`. Transitions
//! are monotonic and terminal states are permanent; `result()` on a backend
//! is only valid once the status is `Completed`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Waiting to run.
    Queued,
    /// Currently running.
    Running,
    /// Finished successfully; a result is available.
    Completed,
    /// Finished with an error.
    Failed(String),
    /// Cancelled before completion.
    Cancelled,
}

impl JobStatus {
    /// Whether the job can still make progress.
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    /// Whether this state is permanent.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Whether the job finished successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("Queued"),
            JobStatus::Running => f.write_str("Running"),
            JobStatus::Completed => f.write_str("Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => f.write_str("Cancelled"),
        }
    }
}

/// A tracked job with its lifecycle timestamps.
///
/// `transition` stamps `started_at` on first entry into `Running` and
/// `finished_at` on first entry into any terminal state, so each timestamp
/// is written at most once over the job's life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The job identifier.
    pub id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Number of shots requested.
    pub shots: u32,
    /// Backend the job was submitted to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// Time the job was created.
    pub created_at: DateTime<Utc>,
    /// Time the job entered `Running`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Time the job reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a new queued job.
    pub fn new(id: impl Into<JobId>, shots: u32) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            shots,
            backend: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Set the backend name.
    #[must_use]
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    /// Move the job to a new status, stamping timestamps on first entry.
    ///
    /// Terminal states are permanent: once the job has finished, further
    /// transitions are ignored.
    pub fn transition(&mut self, status: JobStatus) {
        if self.status.is_terminal() {
            return;
        }
        if matches!(status, JobStatus::Running) && self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        if status.is_terminal() && self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
        self.status = status;
    }

    /// Wall-clock time between start and finish, when both are known.
    pub fn runtime(&self) -> Option<Duration> {
        Some(self.finished_at? - self.started_at?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(JobStatus::Queued.is_pending());
        assert!(JobStatus::Running.is_pending());
        assert!(!JobStatus::Completed.is_pending());

        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("error".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());

        assert!(JobStatus::Completed.is_success());
        assert!(!JobStatus::Cancelled.is_success());
    }

    #[test]
    fn test_new_job_is_queued() {
        let job = Job::new("job-123", 1000).with_backend("simulator");

        assert_eq!(job.id.as_str(), "job-123");
        assert_eq!(job.shots, 1000);
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.backend.as_deref(), Some("simulator"));
        assert!(job.started_at.is_none());
        assert!(job.finished_at.is_none());
    }

    #[test]
    fn test_transition_stamps_timestamps_once() {
        let mut job = Job::new("job-1", 10);

        job.transition(JobStatus::Running);
        assert!(job.started_at.is_some());
        assert!(job.finished_at.is_none());

        let started = job.started_at;
        job.transition(JobStatus::Completed);
        assert_eq!(job.started_at, started);
        assert!(job.finished_at.is_some());
        assert!(job.runtime().is_some());
    }

    #[test]
    fn test_terminal_states_are_permanent() {
        let mut job = Job::new("job-2", 10);
        job.transition(JobStatus::Cancelled);
        job.transition(JobStatus::Completed);

        assert_eq!(job.status, JobStatus::Cancelled);
    }

    #[test]
    fn test_skipping_running_still_finishes() {
        let mut job = Job::new("job-3", 10);
        job.transition(JobStatus::Failed("backend gone".into()));

        assert_eq!(job.status.to_string(), "Failed: backend gone");
        assert!(job.started_at.is_none());
        assert!(job.finished_at.is_some());
        assert_eq!(job.runtime(), None);
    }
}
